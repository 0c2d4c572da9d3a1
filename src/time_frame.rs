//! Support time frames: the discrete planning periods of a multi-period horizon.
use crate::error::ModelError;
use itertools::Itertools;

/// The sorted, de-duplicated support time frames (e.g. years) of a model.
///
/// Time frames are stored in no particular order in input tables; all interval logic works on
/// this sorted view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeFrames(Vec<u32>);

impl TimeFrames {
    /// Create a new [`TimeFrames`] from an unordered collection of time frames.
    ///
    /// Duplicates are removed. An empty collection is an error.
    pub fn new<I>(time_frames: I) -> Result<Self, ModelError>
    where
        I: IntoIterator<Item = u32>,
    {
        let sorted = time_frames.into_iter().sorted_unstable().dedup().collect_vec();
        if sorted.is_empty() {
            return Err(ModelError::EmptyHorizon);
        }

        Ok(Self(sorted))
    }

    /// The first time frame of the horizon
    pub fn min(&self) -> u32 {
        self.0[0]
    }

    /// The last time frame of the horizon
    pub fn max(&self) -> u32 {
        self.0[self.0.len() - 1]
    }

    /// The number of time frames
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false: a horizon contains at least one time frame
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether `time_frame` is part of the horizon
    pub fn contains(&self, time_frame: u32) -> bool {
        self.0.binary_search(&time_frame).is_ok()
    }

    /// Iterate over the time frames in ascending order
    pub fn iter(&self) -> impl Iterator<Item = u32> + Clone + '_ {
        self.0.iter().copied()
    }

    /// Iterate over each time frame together with the one following it.
    ///
    /// The last time frame is paired with `None`.
    pub fn iter_with_next(&self) -> impl Iterator<Item = (u32, Option<u32>)> + Clone + '_ {
        self.0
            .iter()
            .enumerate()
            .map(|(idx, &stf)| (stf, self.0.get(idx + 1).copied()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_sorts_and_dedups() {
        let frames = TimeFrames::new([2040, 2020, 2030, 2020]).unwrap();
        assert_eq!(frames.iter().collect_vec(), [2020, 2030, 2040]);
        assert_eq!(frames.min(), 2020);
        assert_eq!(frames.max(), 2040);
        assert_eq!(frames.len(), 3);
        assert!(frames.contains(2030));
        assert!(!frames.contains(2025));
    }

    #[test]
    fn new_empty() {
        assert_eq!(
            TimeFrames::new(std::iter::empty()),
            Err(ModelError::EmptyHorizon)
        );
    }

    #[test]
    fn iter_with_next() {
        let frames = TimeFrames::new([2035, 2020]).unwrap();
        assert_eq!(
            frames.iter_with_next().collect_vec(),
            [(2020, Some(2035)), (2035, None)]
        );
    }
}
