//! Time windows for demand-side management.
//!
//! Demand shifted away from one timestep must be recovered at another within `delay` timesteps,
//! and once shifted, demand may not be shifted again for `recovery` timesteps. All windows are
//! clipped to the modelled timesteps.
use crate::commodity::CommodityID;
use crate::dsm::DsmMap;
use crate::entity::SiteID;
use crate::error::ModelError;
use itertools::{Either, Itertools, MinMaxResult};
use std::iter;
use std::ops::{Range, RangeInclusive};

/// Demand at `timestep` may be covered by demand shifted from `paired`
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct DsmWindowTuple {
    /// Support time frame
    pub stf: u32,
    /// The timestep at which shifted demand is delivered
    pub timestep: u32,
    /// The timestep from which demand is shifted
    pub paired: u32,
    /// Site of the demand
    pub site: SiteID,
    /// The shifted commodity
    pub commodity: CommodityID,
}

/// The first and last of the given timesteps, if any
fn bounds(timesteps: &[u32]) -> Option<(u32, u32)> {
    match timesteps.iter().copied().minmax() {
        MinMaxResult::NoElements => None,
        MinMaxResult::OneElement(timestep) => Some((timestep, timestep)),
        MinMaxResult::MinMax(lower, upper) => Some((lower, upper)),
    }
}

/// Timesteps within `delay` of `timestep`, clipped to `[lower, upper]`
fn window(timestep: u32, lower: u32, upper: u32, delay: u32) -> RangeInclusive<u32> {
    timestep.saturating_sub(delay).max(lower)..=timestep.saturating_add(delay).min(upper)
}

/// The timesteps from which demand may be shifted to `timestep`.
///
/// These are the timesteps within `delay` of `timestep` which lie between the first and last of
/// `timesteps`. The window is empty if `timesteps` is.
pub fn dsm_time_window(timestep: u32, timesteps: &[u32], delay: u32) -> RangeInclusive<u32> {
    match bounds(timesteps) {
        Some((lower, upper)) => window(timestep, lower, upper, delay),
        #[allow(clippy::reversed_empty_ranges)]
        None => 1..=0,
    }
}

/// The timesteps following a shift at `timestep` during which demand may not be shifted again.
///
/// This is `[timestep, timestep + recovery)`, clipped at the last of `timesteps`.
pub fn dsm_recovery_window(timestep: u32, timesteps: &[u32], recovery: u32) -> Range<u32> {
    let Some((_, upper)) = bounds(timesteps) else {
        return timestep..timestep;
    };

    let end = timestep
        .saturating_add(recovery)
        .min(upper.saturating_add(1))
        .max(timestep);
    timestep..end
}

/// All pairs of timesteps between which demand may be shifted.
///
/// For every `(stf, site, commodity)` in `site_commodities` and every timestep `t`, yields a
/// tuple for each timestep returned by [`dsm_time_window`] for the DSM delay of that site and
/// commodity. Yields nothing at all if `dsm` is empty. A site and commodity without a DSM record
/// yields a [`ModelError::Lookup`].
pub fn dsm_window_tuples<'a, I>(
    timesteps: &'a [u32],
    site_commodities: I,
    dsm: &'a DsmMap,
) -> impl Iterator<Item = Result<DsmWindowTuple, ModelError>> + 'a
where
    I: IntoIterator<Item = &'a (u32, SiteID, CommodityID)>,
    I::IntoIter: 'a,
{
    let (Some((lower, upper)), false) = (bounds(timesteps), dsm.is_empty()) else {
        return Either::Left(iter::empty());
    };

    Either::Right(
        site_commodities
            .into_iter()
            .flat_map(move |(stf, site, commodity)| {
                let Some(record) = dsm.get(&(site.clone(), commodity.clone())) else {
                    return Either::Left(iter::once(Err(ModelError::lookup(
                        "DSM",
                        &(site, commodity),
                    ))));
                };

                let delay = record.delay;
                Either::Right(timesteps.iter().flat_map(move |&timestep| {
                    window(timestep, lower, upper, delay).map(move |paired| {
                        Ok(DsmWindowTuple {
                            stf: *stf,
                            timestep,
                            paired,
                            site: site.clone(),
                            commodity: commodity.clone(),
                        })
                    })
                }))
            }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixture::dsm;
    use rstest::rstest;

    #[rstest]
    #[case(1, 5, 0..=6)]
    #[case(0, 5, 0..=5)]
    #[case(5, 5, 0..=10)]
    #[case(9, 5, 4..=10)]
    #[case(10, 0, 10..=10)]
    #[case(3, 2, 1..=5)]
    fn dsm_time_window_clipped(
        #[case] timestep: u32,
        #[case] delay: u32,
        #[case] expected: RangeInclusive<u32>,
    ) {
        let timesteps = (0..=10).collect_vec();
        assert_eq!(dsm_time_window(timestep, &timesteps, delay), expected);
    }

    #[test]
    fn dsm_time_window_offset_timesteps() {
        // Timesteps need not start at zero
        let timesteps = (100..=110).collect_vec();
        assert_eq!(dsm_time_window(101, &timesteps, 5), 100..=106);
    }

    #[test]
    fn dsm_time_window_no_timesteps() {
        assert_eq!(dsm_time_window(1, &[], 5).count(), 0);
    }

    #[rstest]
    #[case(2, 3, 2..5)]
    #[case(8, 5, 8..11)]
    #[case(10, 1, 10..11)]
    #[case(4, 0, 4..4)]
    fn dsm_recovery_window_clipped(
        #[case] timestep: u32,
        #[case] recovery: u32,
        #[case] expected: Range<u32>,
    ) {
        let timesteps = (0..=10).collect_vec();
        assert_eq!(dsm_recovery_window(timestep, &timesteps, recovery), expected);
    }

    #[rstest]
    fn dsm_window_tuples_clipped(dsm: DsmMap) {
        let timesteps = (0..=10).collect_vec();
        let site_commodities = [(2020, SiteID::new("Campus"), CommodityID::new("Elec"))];
        let tuples: Vec<_> = dsm_window_tuples(&timesteps, &site_commodities, &dsm)
            .try_collect()
            .unwrap();

        let paired = tuples
            .iter()
            .filter(|tuple| tuple.timestep == 1)
            .map(|tuple| tuple.paired)
            .collect_vec();
        assert_eq!(paired, (0..=6).collect_vec());
        assert!(tuples.iter().all(|tuple| tuple.paired <= 10));
        assert!(tuples.iter().all(|tuple| tuple.stf == 2020));
    }

    #[test]
    fn dsm_window_tuples_empty_table() {
        let timesteps = (0..=10).collect_vec();
        // Without DSM records, the site and commodity is not looked up at all
        let site_commodities = [(2020, SiteID::new("Campus"), CommodityID::new("Elec"))];
        assert_eq!(
            dsm_window_tuples(&timesteps, &site_commodities, &DsmMap::new()).count(),
            0
        );
    }

    #[rstest]
    fn dsm_window_tuples_missing_record(dsm: DsmMap) {
        let timesteps = (0..=10).collect_vec();
        let site_commodities = [(2020, SiteID::new("North"), CommodityID::new("Heat"))];
        let result: Result<Vec<_>, _> =
            dsm_window_tuples(&timesteps, &site_commodities, &dsm).collect();
        assert!(matches!(result, Err(ModelError::Lookup { table: "DSM", .. })));
    }
}
