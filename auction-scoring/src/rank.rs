use std::cmp::Reverse;

use arrayvec::ArrayVec;

use crate::num::CompositeScore;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Entry<Id> {
    pub id: Id,
    pub score: CompositeScore,
}

/// Bidders in descending order of composite score.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Ranking<Id> {
    entries: Vec<Entry<Id>>,
}

/// Order the scored bidders by descending composite score.
///
/// The sort is stable: bidders with equal (rounded) scores keep their input order, so the earlier
/// bidder wins a tie.
pub fn rank<Id, Scored>(scored: Scored) -> Ranking<Id>
where
    Scored: IntoIterator<Item = (Id, CompositeScore)>,
{
    let mut entries: Vec<Entry<Id>> = scored
        .into_iter()
        .map(|(id, score)| Entry { id, score })
        .collect();
    let mut sort =
        permutation::sort_by_key(entries.as_slice(), |entry: &Entry<Id>| Reverse(entry.score));
    sort.apply_slice_in_place(&mut entries);
    Ranking { entries }
}

impl<Id> Ranking<Id> {
    pub fn empty() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The top entry, or `None` when nobody was ranked.
    pub fn winner(&self) -> Option<&Entry<Id>> {
        self.entries.first()
    }

    pub fn entries(&self) -> &[Entry<Id>] {
        &self.entries
    }

    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.entries.iter().map(|entry| &entry.id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Up to `LIMIT` of the highest ranked entries.
    pub fn top<const LIMIT: usize>(&self) -> ArrayVec<&Entry<Id>, LIMIT> {
        self.entries.iter().take(LIMIT).collect()
    }

    /// 0-based place of `id` in the ranking.
    pub fn position(&self, id: &Id) -> Option<usize>
    where
        Id: PartialEq,
    {
        self.entries.iter().position(|entry| &entry.id == id)
    }
}

impl<Id> Default for Ranking<Id> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<Id> IntoIterator for Ranking<Id> {
    type Item = Entry<Id>;
    type IntoIter = std::vec::IntoIter<Entry<Id>>;
    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
