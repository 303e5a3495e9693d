// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use crate::cli::LogsiftArgs;
use crate::freq::FrequencyTable;
use enum_dispatch::enum_dispatch;
use regex::Regex;
use std::collections::BTreeSet;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PatternError {
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Substrings shaped like four dot-separated groups of 1-3 digits.
///
/// Deliberately no octet bounds and no private/reserved-range exclusion, so
/// `999.999.999.999` counts as an address.
const IPV4_PATTERN: &str = r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}";

/// The severity tokens counted by the default mode.
const SEVERITY_PATTERN: &str = "ERROR|CRITICAL";

/// Trait for the per-mode processing strategies
///
/// An analyzer is fed the input one line at a time and produces its result
/// rows exactly once, when the stream has ended. Strategies share no state;
/// exactly one is constructed per run.
#[enum_dispatch]
pub trait Analyze {
    /// Feeds one input line (without its line terminator) to the strategy.
    fn consume_line(&mut self, line: &str);

    /// Consumes the strategy and returns its result rows in output order.
    fn finish(self) -> Vec<String>;
}

/// Compiles `pattern`, prepending `(?i)` when matching should ignore case.
fn compile(pattern: &str, ignore_case: bool) -> Result<Regex, PatternError> {
    let regex_pattern = if ignore_case {
        format!("(?i){pattern}")
    } else {
        pattern.to_string()
    };

    Regex::new(&regex_pattern).map_err(|source| PatternError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    })
}

/// Counts occurrences of the literal severity tokens `ERROR` and `CRITICAL`.
///
/// Matching is a plain substring search: tokens are not anchored to word or
/// line boundaries, and a single line may contribute several occurrences.
/// With case folding enabled, matched text is uppercased before counting so
/// `error` and `ERROR` land in the same bucket.
#[derive(Debug)]
pub struct ErrorCounter {
    matcher: Regex,
    fold_case: bool,
    counts: FrequencyTable,
}

impl ErrorCounter {
    pub fn new(fold_case: bool) -> Result<Self, PatternError> {
        Ok(Self {
            matcher: compile(SEVERITY_PATTERN, fold_case)?,
            fold_case,
            counts: FrequencyTable::new(),
        })
    }
}

impl Analyze for ErrorCounter {
    fn consume_line(&mut self, line: &str) {
        for found in self.matcher.find_iter(line) {
            if self.fold_case {
                self.counts.record(&found.as_str().to_uppercase());
            } else {
                self.counts.record(found.as_str());
            }
        }
    }

    fn finish(self) -> Vec<String> {
        self.counts
            .ranked()
            .into_iter()
            .map(|(token, count)| format!("{count} {token}"))
            .collect()
    }
}

/// Extracts IPv4-shaped substrings and ranks them by occurrence count.
///
/// Output starts with the literal header row `COUNT IP`; when a top-N limit
/// is set, only the first N ranked rows follow it (`-t 0` yields the header
/// alone).
#[derive(Debug)]
pub struct IpRanker {
    matcher: Regex,
    top: Option<usize>,
    counts: FrequencyTable,
}

impl IpRanker {
    pub fn new(top: Option<usize>) -> Result<Self, PatternError> {
        Ok(Self {
            matcher: compile(IPV4_PATTERN, false)?,
            top,
            counts: FrequencyTable::new(),
        })
    }
}

impl Analyze for IpRanker {
    fn consume_line(&mut self, line: &str) {
        for found in self.matcher.find_iter(line) {
            self.counts.record(found.as_str());
        }
    }

    fn finish(self) -> Vec<String> {
        let ranked = self.counts.ranked();
        let take = self.top.unwrap_or(ranked.len());

        let mut rows = vec!["COUNT IP".to_string()];
        rows.extend(
            ranked
                .into_iter()
                .take(take)
                .map(|(ip, count)| format!("{count} {ip}")),
        );
        rows
    }
}

/// Selects every line the configured pattern matches as a substring.
///
/// Without unique mode, matching lines come out in encounter order with
/// duplicates kept. Unique mode deduplicates by exact text and sorts
/// byte-wise ascending; original order is not preserved. Dedup compares
/// exact text even when matching ignores case, so distinct-case duplicates
/// both survive.
#[derive(Debug)]
pub struct LineMatcher {
    matcher: Regex,
    unique: bool,
    selected: Vec<String>,
}

impl LineMatcher {
    pub fn new(pattern: &str, ignore_case: bool, unique: bool) -> Result<Self, PatternError> {
        Ok(Self {
            matcher: compile(pattern, ignore_case)?,
            unique,
            selected: Vec::new(),
        })
    }
}

impl Analyze for LineMatcher {
    fn consume_line(&mut self, line: &str) {
        if self.matcher.is_match(line) {
            self.selected.push(line.to_string());
        }
    }

    fn finish(self) -> Vec<String> {
        if self.unique {
            let deduplicated: BTreeSet<String> = self.selected.into_iter().collect();
            deduplicated.into_iter().collect()
        } else {
            self.selected
        }
    }
}

/// Enum dispatch over the three processing strategies
#[enum_dispatch(Analyze)]
#[derive(Debug)]
pub enum ModeAnalyzer {
    Errors(ErrorCounter),
    Ips(IpRanker),
    Grep(LineMatcher),
}

impl ModeAnalyzer {
    /// Builds the analyzer selected on the command line.
    ///
    /// Mode exclusivity is already enforced by the argument parser; the
    /// fallthrough here only picks the default when no mode flag was given.
    pub fn from_args(args: &LogsiftArgs) -> Result<Self, PatternError> {
        if args.ips {
            Ok(ModeAnalyzer::Ips(IpRanker::new(args.top)?))
        } else if let Some(pattern) = &args.grep {
            Ok(ModeAnalyzer::Grep(LineMatcher::new(
                pattern,
                args.ignore_case,
                args.unique,
            )?))
        } else {
            Ok(ModeAnalyzer::Errors(ErrorCounter::new(args.ignore_case)?))
        }
    }
}
