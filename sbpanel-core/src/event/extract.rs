use crate::event::types::{Event, LogFormat};
use chrono::{NaiveDateTime, NaiveTime};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("invalid time of day '{raw}' on {kind} line")]
    TimeOfDay { kind: &'static str, raw: String },

    #[error("invalid start timestamp '{raw}'")]
    StartTimestamp { raw: String },
}

const START: &str = r"^Start logging at: (?P<stamp>.+?)\s*$";

const TIME_PREFIX: &str = r"\[(?P<time>[^\]]*)\] ";

const VERSION: &str = r"Info: Server version '(?P<version>.+?)'";
const BIND: &str = r"Info: TcpServer listening on: .+:(?P<port>\d+)\s*$";
const LOGIN: &str = r"Info: Client '(?P<name>.+?)' <[^>]*> \(.*?\) connected\s*$";
const LOGOUT: &str = r"Info: Client '(?P<name>.+?)' <[^>]*> \(.*?\) disconnected\s*$";
const WORLD_LOAD: &str = r"Info: Loading world db for world (?P<coords>\S+)";
const WORLD_UNLOAD: &str = r"Info: Shutting down world (?P<coords>\S+)";
const CHAT_TIMESTAMPED: &str = r"Info: Chat: <(?P<name>.+?)> (?P<text>.+)$";
const CHAT_PLAIN: &str = r"Info:  <(?P<name>.+?)> (?P<text>.+)$";

static START_RE: Lazy<Regex> = Lazy::new(|| compile(START));
static TIMESTAMPED: Lazy<PatternSet> = Lazy::new(|| PatternSet::new(true, CHAT_TIMESTAMPED));
static PLAIN: Lazy<PatternSet> = Lazy::new(|| PatternSet::new(false, CHAT_PLAIN));

fn compile(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| panic!("built-in pattern {pattern:?} is invalid: {e}"))
}

/// One log flavour's patterns, held in priority order.
struct PatternSet {
    timed: bool,
    version: Regex,
    bind: Regex,
    login: Regex,
    logout: Regex,
    world_load: Regex,
    world_unload: Regex,
    chat: Regex,
}

impl PatternSet {
    fn new(timed: bool, chat: &str) -> Self {
        let prefix = if timed { TIME_PREFIX } else { "" };
        let anchored = |body: &str| compile(&format!("^{prefix}{body}"));

        Self {
            timed,
            version: anchored(VERSION),
            bind: anchored(BIND),
            login: anchored(LOGIN),
            logout: anchored(LOGOUT),
            world_load: anchored(WORLD_LOAD),
            world_unload: anchored(WORLD_UNLOAD),
            chat: anchored(chat),
        }
    }

    fn extract(&self, line: &str) -> Result<Option<Event>, ExtractError> {
        if let Some(caps) = self.version.captures(line) {
            return Ok(Some(Event::VersionAnnounced {
                version: caps["version"].to_string(),
                launch: !self.timed,
            }));
        }

        if let Some(caps) = self.bind.captures(line) {
            // Out-of-range digits are not a listener we can report.
            if let Ok(port) = caps["port"].parse() {
                return Ok(Some(Event::PortBound { port }));
            }
        }

        if let Some(caps) = self.login.captures(line) {
            return Ok(Some(Event::PlayerConnected {
                name: caps["name"].to_string(),
                time: self.time_of_day(&caps, "login")?,
            }));
        }

        if let Some(caps) = self.logout.captures(line) {
            return Ok(Some(Event::PlayerDisconnected {
                name: caps["name"].to_string(),
                time: self.time_of_day(&caps, "logout")?,
            }));
        }

        if let Some(caps) = self.world_load.captures(line) {
            return Ok(Some(Event::WorldLoaded {
                coords: caps["coords"].to_string(),
                time: self.time_of_day(&caps, "world_load")?,
            }));
        }

        if let Some(caps) = self.world_unload.captures(line) {
            return Ok(Some(Event::WorldUnloaded {
                coords: caps["coords"].to_string(),
                time: self.time_of_day(&caps, "world_unload")?,
            }));
        }

        if let Some(caps) = self.chat.captures(line) {
            return Ok(Some(Event::ChatMessage {
                name: caps["name"].to_string(),
                text: caps["text"].to_string(),
                time: self.time_of_day(&caps, "chat")?,
            }));
        }

        Ok(None)
    }

    fn time_of_day(
        &self,
        caps: &Captures<'_>,
        kind: &'static str,
    ) -> Result<Option<NaiveTime>, ExtractError> {
        if !self.timed {
            return Ok(None);
        }

        let raw = caps.name("time").map_or("", |m| m.as_str());
        parse_time_of_day(raw)
            .map(Some)
            .ok_or_else(|| ExtractError::TimeOfDay {
                kind,
                raw: raw.to_string(),
            })
    }
}

/// Stateless line parser.
///
/// Lines that match nothing yield `Ok(None)`. A line that matches a pattern
/// but carries an unparseable time is an error for that line only.
#[derive(Debug, Clone, Copy, Default)]
pub struct EventExtractor {
    format: LogFormat,
}

impl EventExtractor {
    pub fn new(format: LogFormat) -> Self {
        Self { format }
    }

    pub fn format(&self) -> LogFormat {
        self.format
    }

    pub fn extract(&self, line: &str) -> Result<Option<Event>, ExtractError> {
        let line = line.trim_end_matches(['\r', '\n']);

        if let Some(caps) = START_RE.captures(line) {
            return parse_start(&caps["stamp"]).map(Some);
        }

        for set in self.pattern_sets() {
            if let Some(event) = set.extract(line)? {
                return Ok(Some(event));
            }
        }

        Ok(None)
    }

    fn pattern_sets(&self) -> impl Iterator<Item = &'static PatternSet> {
        let (first, second): (&'static PatternSet, Option<&'static PatternSet>) =
            match self.format {
                LogFormat::Timestamped => (&*TIMESTAMPED, None),
                LogFormat::Plain => (&*PLAIN, None),
                LogFormat::Auto => (&*TIMESTAMPED, Some(&*PLAIN)),
            };

        std::iter::once(first).chain(second)
    }
}

fn parse_start(raw: &str) -> Result<Event, ExtractError> {
    ["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|stamp| Event::ServerStarted {
            date: stamp.date(),
            time: stamp.time(),
        })
        .ok_or_else(|| ExtractError::StartTimestamp {
            raw: raw.to_string(),
        })
}

fn parse_time_of_day(raw: &str) -> Option<NaiveTime> {
    ["%H:%M:%S%.f", "%H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(raw, fmt).ok())
}
