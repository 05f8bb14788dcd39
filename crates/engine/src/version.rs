//! # Version Model
//!
//! A totally ordered document format version with PEP 440-style precedence:
//! `1.0.dev1 < 1.0a1 < 1.0rc2 < 1.0 == 1.0.0 < 1.0.post1 < 1.0+local`.
//!
//! [`Version::parse`] understands three encodings, tried in order:
//!
//! 1. canonical public version syntax (`1.0`, `0.21.2`, `1.1rc1`, `1!2.0.post3.dev1+abc`);
//! 2. the historical release + build form written by older FreeCAD builds (`1.1R42542`),
//!    reinterpreted as `1.1.42542`;
//! 3. a lenient retry of (1) on the prefix preceding the first character outside
//!    `[A-Za-z0-9._-]`, so `0.22 (dev)` reads as `0.22`.
//!
//! The `r`/`rev` post-release spellings are deliberately absent from the canonical grammar;
//! an `R` after a release always denotes a build number.

use crate::error::MigrationError;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Pre-release phase, ordered `a < b < rc`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PrePhase {
    Alpha,
    Beta,
    ReleaseCandidate,
}

impl PrePhase {
    const fn label(self) -> &'static str {
        match self {
            Self::Alpha => "a",
            Self::Beta => "b",
            Self::ReleaseCandidate => "rc",
        }
    }
}

/// Segment of a `+local` label. Text sorts before numbers.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum LocalSegment {
    Text(String),
    Number(u64),
}

impl fmt::Display for LocalSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Number(n) => write!(f, "{n}"),
        }
    }
}

/// Where the pre-release slot sits relative to the final release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum PreKey {
    /// A bare `.devN` sorts before any pre-release of the same release.
    DevOnly,
    Pre(PrePhase, u64),
    Final,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
enum DevKey {
    Dev(u64),
    Final,
}

/// A parsed, normalized document format version.
#[derive(Debug, Clone)]
pub struct Version {
    epoch: u64,
    release: Vec<u64>,
    pre: Option<(PrePhase, u64)>,
    post: Option<u64>,
    dev: Option<u64>,
    local: Vec<LocalSegment>,
}

impl Version {
    /// Parses a version using the canonical, historical and lenient strategies in turn.
    ///
    /// # Errors
    /// Returns [`MigrationError::UnrecognizedVersion`] when no strategy succeeds.
    pub fn parse(raw: &str) -> Result<Self, MigrationError> {
        let trimmed = raw.trim();

        parse_canonical(trimmed)
            .or_else(|| parse_historical(trimmed))
            .or_else(|| parse_lenient(trimmed))
            .ok_or_else(|| MigrationError::UnrecognizedVersion {
                raw: raw.to_owned().into(),
                context: None,
            })
    }

    #[must_use]
    pub fn release(&self) -> &[u64] {
        &self.release
    }

    #[must_use]
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    /// True for alpha/beta/rc and development releases.
    #[must_use]
    pub const fn is_prerelease(&self) -> bool {
        self.pre.is_some() || self.dev.is_some()
    }

    #[must_use]
    pub const fn is_postrelease(&self) -> bool {
        self.post.is_some()
    }

    /// Release components without trailing zeros, so `1.0` and `1.0.0` compare equal.
    fn significant_release(&self) -> &[u64] {
        let len = self.release.iter().rposition(|&n| n != 0).map_or(0, |i| i + 1);
        &self.release[..len]
    }

    const fn pre_key(&self) -> PreKey {
        match (self.pre, self.post, self.dev) {
            (None, None, Some(_)) => PreKey::DevOnly,
            (Some((phase, n)), _, _) => PreKey::Pre(phase, n),
            _ => PreKey::Final,
        }
    }

    const fn dev_key(&self) -> DevKey {
        match self.dev {
            Some(n) => DevKey::Dev(n),
            None => DevKey::Final,
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.epoch
            .cmp(&other.epoch)
            .then_with(|| self.significant_release().cmp(other.significant_release()))
            .then_with(|| self.pre_key().cmp(&other.pre_key()))
            .then_with(|| self.post.cmp(&other.post))
            .then_with(|| self.dev_key().cmp(&other.dev_key()))
            .then_with(|| self.local.cmp(&other.local))
    }
}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.epoch.hash(state);
        self.significant_release().hash(state);
        self.pre_key().hash(state);
        self.post.hash(state);
        self.dev_key().hash(state);
        self.local.hash(state);
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.epoch != 0 {
            write!(f, "{}!", self.epoch)?;
        }

        let release: Vec<String> = self.release.iter().map(ToString::to_string).collect();
        f.write_str(&release.join("."))?;

        if let Some((phase, n)) = self.pre {
            write!(f, "{}{n}", phase.label())?;
        }
        if let Some(n) = self.post {
            write!(f, ".post{n}")?;
        }
        if let Some(n) = self.dev {
            write!(f, ".dev{n}")?;
        }
        if !self.local.is_empty() {
            let local: Vec<String> = self.local.iter().map(ToString::to_string).collect();
            write!(f, "+{}", local.join("."))?;
        }
        Ok(())
    }
}

impl FromStr for Version {
    type Err = MigrationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// --- Strategy 2: historical `MAJOR.MINOR` + `R` + `BUILD` ---

fn parse_historical(raw: &str) -> Option<Version> {
    let (release, rest) = raw.split_once('R')?;

    let mut components = release.split('.');
    let well_formed = components.clone().count() >= 2
        && components.all(|c| !c.is_empty() && c.bytes().all(|b| b.is_ascii_digit()));
    if !well_formed {
        return None;
    }

    let build_len = rest.bytes().take_while(u8::is_ascii_digit).count();
    if build_len == 0 {
        return None;
    }

    parse_canonical(&format!("{release}.{}", &rest[..build_len]))
}

// --- Strategy 3: strip trailing noise ---

fn parse_lenient(raw: &str) -> Option<Version> {
    let prefix = raw
        .split(|c: char| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
        .next()?;
    if prefix.is_empty() || prefix == raw {
        return None;
    }
    parse_canonical(prefix)
}

// --- Strategy 1: canonical grammar ---

const PRE_SPELLINGS: [(&str, PrePhase); 8] = [
    ("alpha", PrePhase::Alpha),
    ("a", PrePhase::Alpha),
    ("beta", PrePhase::Beta),
    ("b", PrePhase::Beta),
    ("preview", PrePhase::ReleaseCandidate),
    ("pre", PrePhase::ReleaseCandidate),
    ("rc", PrePhase::ReleaseCandidate),
    ("c", PrePhase::ReleaseCandidate),
];

fn parse_canonical(raw: &str) -> Option<Version> {
    let lowered = raw.to_ascii_lowercase();
    let mut scanner = Scanner::new(&lowered);

    scanner.eat("v");
    let epoch = scanner.attempt(|s| {
        let n = s.number()?;
        s.eat("!").then_some(n)
    });
    let release = scanner.release()?;
    let pre = scanner.attempt(Scanner::pre_release);
    let post = scanner.attempt(Scanner::post_release);
    let dev = scanner.attempt(Scanner::dev_release);
    let local = scanner.attempt(Scanner::local_label).unwrap_or_default();

    scanner.is_done().then(|| Version {
        epoch: epoch.unwrap_or(0),
        release,
        pre,
        post,
        dev,
        local,
    })
}

/// Byte cursor over an already lower-cased version string.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    const fn is_done(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Runs `parse`, rewinding the cursor if it yields nothing.
    fn attempt<T>(&mut self, parse: impl FnOnce(&mut Self) -> Option<T>) -> Option<T> {
        let saved = self.pos;
        let result = parse(self);
        if result.is_none() {
            self.pos = saved;
        }
        result
    }

    fn eat(&mut self, literal: &str) -> bool {
        if self.rest().starts_with(literal) {
            self.pos += literal.len();
            true
        } else {
            false
        }
    }

    fn separator(&mut self) -> bool {
        self.eat(".") || self.eat("-") || self.eat("_")
    }

    fn number(&mut self) -> Option<u64> {
        let len = self.rest().bytes().take_while(u8::is_ascii_digit).count();
        if len == 0 {
            return None;
        }
        let n = self.rest()[..len].parse().ok()?;
        self.pos += len;
        Some(n)
    }

    fn release(&mut self) -> Option<Vec<u64>> {
        let mut release = vec![self.number()?];
        while let Some(n) = self.attempt(|s| if s.eat(".") { s.number() } else { None }) {
            release.push(n);
        }
        Some(release)
    }

    fn pre_release(&mut self) -> Option<(PrePhase, u64)> {
        self.separator();
        let phase = PRE_SPELLINGS.iter().find(|(spelling, _)| self.eat(spelling)).map(|(_, p)| *p)?;
        Some((phase, self.optional_number()))
    }

    fn post_release(&mut self) -> Option<u64> {
        if let Some(n) = self.attempt(|s| if s.eat("-") { s.number() } else { None }) {
            return Some(n);
        }
        self.separator();
        self.eat("post").then(|| self.optional_number())
    }

    fn dev_release(&mut self) -> Option<u64> {
        self.separator();
        self.eat("dev").then(|| self.optional_number())
    }

    fn local_label(&mut self) -> Option<Vec<LocalSegment>> {
        if !self.eat("+") {
            return None;
        }
        let label = self.rest();
        let segments: Vec<LocalSegment> = label
            .split(['.', '-', '_'])
            .map(|segment| {
                if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_alphanumeric()) {
                    None
                } else if segment.bytes().all(|b| b.is_ascii_digit()) {
                    segment.parse().ok().map(LocalSegment::Number)
                } else {
                    Some(LocalSegment::Text(segment.to_owned()))
                }
            })
            .collect::<Option<_>>()?;
        self.pos = self.input.len();
        Some(segments)
    }

    /// `[sep] digits`, defaulting to zero when absent.
    fn optional_number(&mut self) -> u64 {
        self.attempt(|s| {
            s.separator();
            s.number()
        })
        .unwrap_or(0)
    }
}
