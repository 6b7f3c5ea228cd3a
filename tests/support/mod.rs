#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, TimeZone, Utc};
use futures::future::BoxFuture;

use game_light::error::{DeviceError, DeviceResult, ProviderError, ProviderResult};
use game_light::light::LightDevice;
use game_light::model::bulb::LightReading;
use game_light::model::game::{GameInfo, GameSummary};
use game_light::model::team::{Hsv, TeamConfig};
use game_light::provider::GameInfoProvider;
use game_light::timing::Clock;

pub const PURPLE: Hsv = Hsv::new(280, 100, 100);

pub fn ravens() -> TeamConfig {
    TeamConfig {
        label: "RAVENS".to_string(),
        name: "Baltimore Ravens".to_string(),
        team_id: "33".to_string(),
        sport_path: "football/nfl".to_string(),
        color: PURPLE,
    }
}

pub fn base_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 9, 7, 17, 0, 0).unwrap()
}

pub fn game(id: &str, kickoff: DateTime<Utc>, completed: bool) -> GameInfo {
    GameInfo {
        kickoff,
        name: "Baltimore Ravens at Buffalo Bills".to_string(),
        id: id.to_string(),
        completed,
    }
}

pub fn summary(score: u32, completed: bool) -> GameSummary {
    let mut s = GameSummary {
        completed,
        detail: Some(if completed { "Final" } else { "2nd Quarter" }.to_string()),
        ..Default::default()
    };
    s.scores.insert("33".to_string(), Some(score));
    s.scores.insert("2".to_string(), Some(7));
    s
}

/// Wall clock that follows tokio's (possibly paused) clock from a fixed starting point.
pub struct VirtualClock {
    base: DateTime<Utc>,
    start: tokio::time::Instant,
}

impl VirtualClock {
    pub fn starting_at(base: DateTime<Utc>) -> Self {
        Self {
            base,
            start: tokio::time::Instant::now(),
        }
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = chrono::TimeDelta::from_std(self.start.elapsed()).unwrap();
        self.base + elapsed
    }
}

/// Commands a light received, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Refresh,
    On,
    Off,
    Hsv(Hsv),
    ColorTemp(u16, Option<u8>),
    Read,
}

#[derive(Debug, Default)]
struct LightInner {
    reading: LightReading,
    log: Vec<Command>,
    no_light_module: bool,
    fail_reads: bool,
    fail_writes: bool,
    /// Fail every `turn_off` once this many have succeeded.
    offs_before_failure: Option<usize>,
    offs: usize,
}

/// In-memory light that behaves like a color bulb and records every command.
#[derive(Clone, Default)]
pub struct FakeLight {
    inner: Arc<Mutex<LightInner>>,
}

impl FakeLight {
    pub fn with_reading(reading: LightReading) -> Self {
        let light = Self::default();
        light.inner.lock().unwrap().reading = reading;
        light
    }

    pub fn warm_white() -> Self {
        Self::with_reading(LightReading {
            is_on: true,
            hsv: None,
            color_temp: Some(2700),
            brightness: Some(100),
        })
    }

    pub fn without_light_module() -> Self {
        let light = Self::default();
        light.inner.lock().unwrap().no_light_module = true;
        light
    }

    pub fn fail_reads(&self) {
        self.inner.lock().unwrap().fail_reads = true;
    }

    pub fn fail_writes(&self) {
        self.inner.lock().unwrap().fail_writes = true;
    }

    pub fn fail_turn_off_after(&self, successes: usize) {
        self.inner.lock().unwrap().offs_before_failure = Some(successes);
    }

    pub fn reading(&self) -> LightReading {
        self.inner.lock().unwrap().reading
    }

    pub fn log(&self) -> Vec<Command> {
        self.inner.lock().unwrap().log.clone()
    }

    pub fn count(&self, command: Command) -> usize {
        self.log().into_iter().filter(|c| *c == command).count()
    }

    pub fn clear_log(&self) {
        self.inner.lock().unwrap().log.clear();
    }

    fn write(&self, command: Command) -> DeviceResult<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.log.push(command);
        if inner.no_light_module {
            return Err(DeviceError::NoLightModule);
        }
        if inner.fail_writes {
            return Err(io_error("write refused"));
        }
        match command {
            Command::On => inner.reading.is_on = true,
            Command::Off => {
                if let Some(limit) = inner.offs_before_failure {
                    if inner.offs >= limit {
                        return Err(io_error("connection reset"));
                    }
                }
                inner.offs += 1;
                inner.reading.is_on = false;
            }
            Command::Hsv(hsv) => {
                inner.reading.is_on = true;
                inner.reading.hsv = Some(hsv);
                inner.reading.color_temp = None;
                inner.reading.brightness = Some(hsv.value);
            }
            Command::ColorTemp(kelvin, brightness) => {
                inner.reading.is_on = true;
                inner.reading.hsv = None;
                inner.reading.color_temp = Some(kelvin);
                if brightness.is_some() {
                    inner.reading.brightness = brightness;
                }
            }
            Command::Refresh | Command::Read => {}
        }
        Ok(())
    }
}

fn io_error(message: &str) -> DeviceError {
    DeviceError::Io(std::io::Error::other(message.to_string()))
}

impl LightDevice for FakeLight {
    fn refresh(&self) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().unwrap();
            inner.log.push(Command::Refresh);
            if inner.no_light_module {
                return Err(DeviceError::NoLightModule);
            }
            if inner.fail_reads {
                return Err(io_error("host unreachable"));
            }
            Ok(())
        })
    }

    fn turn_on(&self) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move { self.write(Command::On) })
    }

    fn turn_off(&self) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move { self.write(Command::Off) })
    }

    fn set_hsv(&self, hsv: Hsv) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move { self.write(Command::Hsv(hsv)) })
    }

    fn set_color_temp(&self, kelvin: u16, brightness: Option<u8>) -> BoxFuture<'_, DeviceResult<()>> {
        Box::pin(async move { self.write(Command::ColorTemp(kelvin, brightness)) })
    }

    fn read_state(&self) -> BoxFuture<'_, DeviceResult<LightReading>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().unwrap();
            inner.log.push(Command::Read);
            if inner.no_light_module {
                return Err(DeviceError::NoLightModule);
            }
            if inner.fail_reads {
                return Err(io_error("host unreachable"));
            }
            Ok(inner.reading)
        })
    }
}

/// One scripted summary response.
pub enum SummaryStep {
    Ok(GameSummary),
    Err(ProviderError),
    Panic,
}

#[derive(Default)]
struct ProviderInner {
    schedule: VecDeque<ProviderResult<Option<GameInfo>>>,
    summaries: VecDeque<SummaryStep>,
    schedule_calls: usize,
    summary_calls: usize,
}

/// Provider that replays queued responses. An empty schedule queue means "no game";
/// an empty summary queue means "final".
#[derive(Clone, Default)]
pub struct ScriptedProvider {
    inner: Arc<Mutex<ProviderInner>>,
}

impl ScriptedProvider {
    pub fn push_game(&self, game: Option<GameInfo>) -> &Self {
        self.inner.lock().unwrap().schedule.push_back(Ok(game));
        self
    }

    pub fn push_schedule_error(&self, error: ProviderError) -> &Self {
        self.inner.lock().unwrap().schedule.push_back(Err(error));
        self
    }

    pub fn push_summary(&self, step: SummaryStep) -> &Self {
        self.inner.lock().unwrap().summaries.push_back(step);
        self
    }

    pub fn push_scores(&self, scores: &[u32]) -> &Self {
        for &score in scores {
            self.push_summary(SummaryStep::Ok(summary(score, false)));
        }
        self
    }

    pub fn schedule_calls(&self) -> usize {
        self.inner.lock().unwrap().schedule_calls
    }

    pub fn summary_calls(&self) -> usize {
        self.inner.lock().unwrap().summary_calls
    }
}

impl GameInfoProvider for ScriptedProvider {
    fn next_game<'a>(
        &'a self,
        _team: &'a TeamConfig,
        _now: DateTime<Utc>,
    ) -> BoxFuture<'a, ProviderResult<Option<GameInfo>>> {
        Box::pin(async move {
            let mut inner = self.inner.lock().unwrap();
            inner.schedule_calls += 1;
            inner.schedule.pop_front().unwrap_or(Ok(None))
        })
    }

    fn game_summary<'a>(
        &'a self,
        _team: &'a TeamConfig,
        _game_id: &'a str,
    ) -> BoxFuture<'a, ProviderResult<GameSummary>> {
        Box::pin(async move {
            let step = {
                let mut inner = self.inner.lock().unwrap();
                inner.summary_calls += 1;
                inner.summaries.pop_front()
            };
            match step {
                Some(SummaryStep::Ok(summary)) => Ok(summary),
                Some(SummaryStep::Err(e)) => Err(e),
                Some(SummaryStep::Panic) => panic!("summary feed crashed"),
                None => Ok(summary(0, true)),
            }
        })
    }
}
