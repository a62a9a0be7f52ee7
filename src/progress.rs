//! High-level progress sections shown alongside the form.

use crate::core::{Cursor, Step};
use serde::Serialize;
use std::fmt;

/// Sections of the wider quote journey. Only the first is backed by steps.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Section {
    AboutYou,
    Cars,
    Drivers,
    HowYouDrive,
    Quote,
}

impl Section {
    pub const ALL: [Section; 5] = [
        Section::AboutYou,
        Section::Cars,
        Section::Drivers,
        Section::HowYouDrive,
        Section::Quote,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            Section::AboutYou => "About You",
            Section::Cars => "Cars",
            Section::Drivers => "Drivers",
            Section::HowYouDrive => "How do you drive",
            Section::Quote => "Quote",
        }
    }

    /// Steps belonging to this section.
    pub fn steps(&self) -> &'static [Step] {
        match self {
            Section::AboutYou => &Step::ALL,
            _ => &[],
        }
    }

    fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for Section {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SectionStatus {
    Completed,
    Active,
    Upcoming,
}

/// Section whose steps include the cursor's step.
///
/// `None` once the flow is complete, since no section owns that position.
pub fn active_section(cursor: Cursor) -> Option<Section> {
    let step = cursor.step()?;
    Section::ALL
        .into_iter()
        .find(|section| section.steps().contains(&step))
}

/// Status of every section for the given cursor, in display order.
///
/// Sections before the active one are completed. Without an active
/// section every section is upcoming.
pub fn progress(cursor: Cursor) -> Vec<(Section, SectionStatus)> {
    let active = active_section(cursor).map(|section| section.index());
    Section::ALL
        .iter()
        .map(|section| {
            let status = match active {
                Some(active) if section.index() < active => SectionStatus::Completed,
                Some(active) if section.index() == active => SectionStatus::Active,
                _ => SectionStatus::Upcoming,
            };
            (*section, status)
        })
        .collect()
}
