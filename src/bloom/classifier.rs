use crate::bloom::membership_filter::{accepted, Candidate, MembershipFilter};
use log::trace;
use std::fmt;

/// Outcome of checking a single candidate item against a [`MembershipFilter`].
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Status {
    /// The candidate was absent or empty and could not be checked.
    Invalid,
    /// Every bit for the candidate is set. It was probably added before.
    PossiblyPresent,
    /// At least one bit for the candidate is unset. It was definitely never added.
    Unique,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = match self {
            Status::Invalid => "invalid",
            Status::PossiblyPresent => "possibly present",
            Status::Unique => "unique",
        };
        f.write_str(status)
    }
}

/// A candidate item paired with its [`Status`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct Classification<'a> {
    /// The candidate exactly as supplied.
    pub item: Option<&'a str>,
    /// What the filter says about it.
    pub status: Status,
}

/// Classifies each candidate in `items` against `filter`, in input order.
///
/// Every candidate yields exactly one entry, duplicates included. Absent and empty candidates are
/// reported as [`Status::Invalid`]. The filter is not modified.
///
/// # Examples
///
/// ```
/// use sketchbook::bloom::{classify, MembershipFilter, Status};
///
/// let mut filter = MembershipFilter::new(1000, 3)?;
/// filter.add("password123");
///
/// let results = classify(&filter, vec![Some("password123"), Some(""), None]);
/// let statuses = results.iter().map(|c| c.status).collect::<Vec<_>>();
///
/// assert_eq!(
///     statuses,
///     vec![Status::PossiblyPresent, Status::Invalid, Status::Invalid],
/// );
/// # Ok::<(), sketchbook::Error>(())
/// ```
pub fn classify<'a, I, T>(filter: &MembershipFilter, items: I) -> Vec<Classification<'a>>
where
    I: IntoIterator<Item = T>,
    T: Candidate<'a>,
{
    items
        .into_iter()
        .map(|item| {
            let item = item.into_candidate();
            let status = if accepted(item).is_none() {
                trace!("candidate {:?} is invalid", item);
                Status::Invalid
            } else if filter.contains(item) {
                Status::PossiblyPresent
            } else {
                Status::Unique
            };
            Classification { item, status }
        })
        .collect()
}

impl MembershipFilter {
    /// Classifies each candidate in `items`, in input order. See [`classify`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sketchbook::bloom::{MembershipFilter, Status};
    ///
    /// let mut filter = MembershipFilter::new(1000, 3)?;
    /// filter.add("admin123");
    ///
    /// let results = filter.classify(vec!["admin123", ""]);
    /// assert_eq!(results[0].status, Status::PossiblyPresent);
    /// assert_eq!(results[1].status, Status::Invalid);
    /// # Ok::<(), sketchbook::Error>(())
    /// ```
    pub fn classify<'a, I, T>(&self, items: I) -> Vec<Classification<'a>>
    where
        I: IntoIterator<Item = T>,
        T: Candidate<'a>,
    {
        classify(self, items)
    }
}
