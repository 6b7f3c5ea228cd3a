mod support;

use std::sync::Arc;
use std::time::Duration;

use chrono_tz::Tz;

use game_light::scheduler::Services;
use game_light::supervisor::{FLASH_TEST_POINTS, flash_test, run_all};
use game_light::timing::Timing;

use support::{Command, FakeLight, PURPLE, ScriptedProvider, VirtualClock, base_time, ravens};

fn services(provider: &ScriptedProvider, light: &FakeLight) -> Services {
    Services {
        provider: Arc::new(provider.clone()),
        light: Arc::new(light.clone()),
        clock: Arc::new(VirtualClock::starting_at(base_time())),
    }
}

#[tokio::test(start_paused = true)]
async fn flash_test_colors_flashes_and_restores() {
    let provider = ScriptedProvider::default();
    let light = FakeLight::warm_white();

    flash_test(&ravens(), &services(&provider, &light), &Timing::default()).await;

    let log = light.log();
    assert!(log.contains(&Command::Hsv(PURPLE)));
    assert_eq!(light.count(Command::Off), FLASH_TEST_POINTS as usize);
    assert_eq!(log.last(), Some(&Command::ColorTemp(2700, Some(100))));
    assert_eq!(provider.schedule_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn runs_one_scheduler_per_team() {
    let provider = ScriptedProvider::default();
    let light = FakeLight::warm_white();
    let mut buckeyes = ravens();
    buckeyes.label = "BUCKEYES".to_string();
    buckeyes.team_id = "194".to_string();

    let run = run_all(
        vec![ravens(), buckeyes],
        services(&provider, &light),
        Timing::default(),
        Tz::America__New_York,
    );
    let result = tokio::time::timeout(Duration::from_secs(60), run).await;

    assert!(result.is_err(), "schedulers never return");
    assert_eq!(provider.schedule_calls(), 2, "each team queried once before idling");
}
