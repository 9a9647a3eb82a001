// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Toolkit version and version-string comparison.
//
// Comparison follows the widely deployed "version_compare" rules: strings are
// canonicalised into dot-separated parts, numeric parts compare numerically,
// and pre-release words rank as dev < alpha < beta < RC < (number) < pl.

use std::cmp::Ordering;
use std::sync::OnceLock;

use regex::Regex;

/// Version of this toolkit.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compare `version` with [`VERSION`].
///
/// Returns `Less` if `version` is older, `Equal` if they match, and `Greater`
/// if `version` is newer. `pr` markers (`1.0pr2`) are read as alpha releases.
pub fn compare_version(version: &str) -> Ordering {
    static PR: OnceLock<Regex> = OnceLock::new();
    let pr = PR.get_or_init(|| Regex::new(r"(\d)pr(\d?)").expect("static regex"));

    let lowered = version.to_lowercase();
    let normalised = pr.replace_all(&lowered, "${1}a${2}");
    compare(&normalised, &VERSION.to_lowercase())
}

/// Compare two arbitrary version strings.
pub fn compare(left: &str, right: &str) -> Ordering {
    match (left.is_empty(), right.is_empty()) {
        (true, true) => return Ordering::Equal,
        (true, false) => return Ordering::Less,
        (false, true) => return Ordering::Greater,
        _ => {}
    }

    let left = canonicalize(left);
    let right = canonicalize(right);
    let left: Vec<&str> = left.split('.').collect();
    let right: Vec<&str> = right.split('.').collect();
    compare_parts(&left, &right)
}

/// Sentinel standing in for "some number" when a word meets a digit run.
const NUMBER: &str = "#";

fn compare_parts(left: &[&str], right: &[&str]) -> Ordering {
    for (l, r) in left.iter().zip(right.iter()) {
        let ord = match (is_number(l), is_number(r)) {
            (true, true) => compare_numbers(l, r),
            (false, false) => special_rank(l).cmp(&special_rank(r)),
            (true, false) => special_rank(NUMBER).cmp(&special_rank(r)),
            (false, true) => special_rank(l).cmp(&special_rank(NUMBER)),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }

    let shared = left.len().min(right.len());
    match left.len().cmp(&right.len()) {
        Ordering::Equal => Ordering::Equal,
        Ordering::Greater => {
            let rest = &left[shared..];
            if is_number(rest[0]) {
                Ordering::Greater
            } else {
                compare_parts(rest, &[NUMBER])
            }
        }
        Ordering::Less => {
            let rest = &right[shared..];
            if is_number(rest[0]) {
                Ordering::Less
            } else {
                compare_parts(&[NUMBER], rest)
            }
        }
    }
}

/// Insert separators at every digit/non-digit boundary and turn any other
/// punctuation into a `.`.
fn canonicalize(version: &str) -> String {
    let mut out = String::with_capacity(version.len() * 2);
    let mut prev: Option<char> = None;

    for c in version.chars() {
        let last_out = out.chars().last();
        match prev {
            None => out.push(if c.is_ascii_alphanumeric() { c } else { '.' }),
            Some(p) => {
                if !c.is_ascii_alphanumeric() {
                    if last_out != Some('.') {
                        out.push('.');
                    }
                } else if (is_non_digit(p) && c.is_ascii_digit())
                    || (p.is_ascii_digit() && is_non_digit(c))
                {
                    if last_out != Some('.') {
                        out.push('.');
                    }
                    out.push(c);
                } else {
                    out.push(c);
                }
            }
        }
        prev = Some(c);
    }
    out
}

fn is_non_digit(c: char) -> bool {
    !c.is_ascii_digit() && c != '.'
}

fn is_number(part: &str) -> bool {
    !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit())
}

fn compare_numbers(left: &str, right: &str) -> Ordering {
    let l = left.trim_start_matches('0');
    let r = right.trim_start_matches('0');
    l.len().cmp(&r.len()).then_with(|| l.cmp(r))
}

/// Rank of a pre-release word; unknown words sort below `dev`.
fn special_rank(part: &str) -> i32 {
    const FORMS: &[(&str, i32)] = &[
        ("dev", 0),
        ("alpha", 1),
        ("a", 1),
        ("beta", 2),
        ("b", 2),
        ("RC", 3),
        ("rc", 3),
        (NUMBER, 4),
        ("pl", 5),
        ("p", 5),
    ];
    FORMS
        .iter()
        .find(|(name, _)| part.starts_with(name))
        .map(|(_, rank)| *rank)
        .unwrap_or(-6)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_version_is_equal() {
        assert_eq!(compare_version(VERSION), Ordering::Equal);
    }

    #[test]
    fn older_and_newer() {
        assert_eq!(compare_version("0.1.0"), Ordering::Less);
        assert_eq!(compare_version("99.0"), Ordering::Greater);
    }

    #[test]
    fn numeric_parts_compare_numerically() {
        assert_eq!(compare("1.10", "1.9"), Ordering::Greater);
        assert_eq!(compare("1.0.0", "1.0"), Ordering::Greater);
    }

    #[test]
    fn prerelease_words_rank_below_release() {
        assert_eq!(compare("1.0a1", "1.0"), Ordering::Less);
        assert_eq!(compare("1.0dev", "1.0alpha"), Ordering::Less);
        assert_eq!(compare("1.0beta", "1.0rc1"), Ordering::Less);
        assert_eq!(compare("1.0RC1", "1.0"), Ordering::Less);
        assert_eq!(compare("1.0pl1", "1.0"), Ordering::Greater);
    }

    #[test]
    fn pr_marker_reads_as_alpha() {
        let pr = format!("{VERSION}pr1");
        let alpha = format!("{VERSION}a1");
        assert_eq!(compare_version(&pr), compare(&alpha, VERSION));
        assert_eq!(compare_version(&pr), Ordering::Less);
    }

    #[test]
    fn separators_are_equivalent() {
        assert_eq!(compare("1-0_0", "1.0.0"), Ordering::Equal);
        assert_eq!(canonicalize("1.0rc1"), "1.0.rc.1");
    }
}
