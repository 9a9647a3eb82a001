// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Common quick links found in most NC State page templates.

const LINKS: &[(&str, &str)] = &[
    ("Academic Calendar", "http://www.ncsu.edu/registrar/calendars/"),
    ("Bookstore", "http://www.fis.ncsu.edu/ncsubookstores/"),
    (
        "Campus Administration",
        "http://www.ncsu.edu/about-nc-state/university-administration/",
    ),
    ("Cashier's Office", "http://www.fis.ncsu.edu/cashier/"),
    (
        "Centennial Campus",
        "http://www.ncsu.edu/about-nc-state/centennial-campus/",
    ),
    (
        "Colleges & Academic Departments",
        "http://www.ncsu.edu/academics/index.html",
    ),
    ("Distance Education", "http://distance.ncsu.edu/"),
    (
        "Financial Aid & Scholarships",
        "http://www7.acs.ncsu.edu/financial_aid/",
    ),
    ("Graduate School", "http://www2.acs.ncsu.edu/grad/"),
    ("Housing", "http://www.ncsu.edu/campus-life/housing/"),
    ("Registration & Records", "http://www.ncsu.edu/registrar/"),
    ("Undergraduate Admissions", "http://www.fis.ncsu.edu/uga/"),
    ("Vista Courses", "http://vista.ncsu.edu/"),
    ("Webmail", "https://webmail.ncsu.edu/"),
    ("Wolfware Courses", "http://courses.ncsu.edu/"),
];

/// Label → URL directory of quick links.
#[derive(Debug, Clone, Copy, Default)]
pub struct Quicklinks;

impl Quicklinks {
    /// All links in display order.
    pub fn links(&self) -> &'static [(&'static str, &'static str)] {
        LINKS
    }

    pub fn url_for(&self, label: &str) -> Option<&'static str> {
        LINKS.iter().find(|(l, _)| *l == label).map(|(_, url)| *url)
    }
}
