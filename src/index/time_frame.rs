//! Tuples describing in which support time frames a unit exists and operates.
//!
//! A unit built in time frame `S` counts as operational in a later time frame `T` only if it is
//! still valid when the time frame *after* `T` starts, since it would otherwise be credited for a
//! period it cannot fully serve. The last time frame has no successor, so it is tested directly.
use crate::entity::{EntityKey, EntityTable, Lifespan};
use crate::error::ModelError;
use crate::time_frame::TimeFrames;
use itertools::Either;
use std::iter;

/// A unit built in one support time frame which is operational in another
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct OperationalTuple<U> {
    /// The unit
    pub unit: U,
    /// Support time frame in which the unit was built
    pub built: u32,
    /// Support time frame in which the unit operates
    pub operating: u32,
}

/// A unit whose validity extends beyond the end of the horizon
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct RestValueTuple<U> {
    /// The unit
    pub unit: U,
    /// Support time frame in which the unit was built
    pub built: u32,
}

/// A unit installed before the horizon which is still operational in a support time frame
#[derive(PartialEq, Eq, Hash, PartialOrd, Ord, Clone, Debug)]
pub struct InstalledTuple<U> {
    /// The unit
    pub unit: U,
    /// Support time frame in which the unit operates
    pub operating: u32,
}

/// Look up the record for `key`, failing if it is absent
fn lookup<'a, K: EntityKey, V>(table: &'a EntityTable<K, V>, key: &K) -> Result<&'a V, ModelError> {
    table
        .get(key)
        .map(AsRef::as_ref)
        .ok_or_else(|| ModelError::lookup(K::TABLE, key))
}

/// Whether capacity which is valid until `valid_until` serves time frame `stf`.
///
/// `next` is the time frame following `stf`, if any.
fn serves(stf: u32, next: Option<u32>, valid_until: u32) -> bool {
    next.unwrap_or(stf) <= valid_until
}

/// Operational tuples for the given base keys.
///
/// For every key built in `S` and every time frame `T >= S`, yields `(unit, S, T)` if the unit
/// serves `T` given that it is valid until `S + depreciation`. Keys missing from `table` yield a
/// [`ModelError::Lookup`].
pub fn operational_tuples<'a, K, V, I>(
    base: I,
    table: &'a EntityTable<K, V>,
    time_frames: &'a TimeFrames,
) -> impl Iterator<Item = Result<OperationalTuple<K::Unit>, ModelError>> + 'a
where
    K: EntityKey + 'a,
    V: Lifespan + 'a,
    I: IntoIterator<Item = &'a K>,
    I::IntoIter: 'a,
{
    base.into_iter()
        .flat_map(move |key| match lookup(table, key) {
            Err(err) => Either::Left(iter::once(Err(err))),
            Ok(entity) => {
                let built = key.support_time_frame();
                let valid_until = built.saturating_add(entity.depreciation());
                let unit = key.unit();
                Either::Right(
                    time_frames
                        .iter_with_next()
                        .filter(move |&(stf, next)| built <= stf && serves(stf, next, valid_until))
                        .map(move |(stf, _)| {
                            Ok(OperationalTuple {
                                unit: unit.clone(),
                                built,
                                operating: stf,
                            })
                        }),
                )
            }
        })
}

/// Rest value tuples for the given base keys.
///
/// Yields `(unit, S)` for every key whose validity `S + depreciation` extends past the last time
/// frame, i.e. whose remaining value must be credited back.
pub fn rest_value_tuples<'a, K, V, I>(
    base: I,
    table: &'a EntityTable<K, V>,
    time_frames: &'a TimeFrames,
) -> impl Iterator<Item = Result<RestValueTuple<K::Unit>, ModelError>> + 'a
where
    K: EntityKey + 'a,
    V: Lifespan + 'a,
    I: IntoIterator<Item = &'a K>,
    I::IntoIter: 'a,
{
    let horizon_end = time_frames.max();
    base.into_iter().filter_map(move |key| {
        let entity = match lookup(table, key) {
            Ok(entity) => entity,
            Err(err) => return Some(Err(err)),
        };
        let built = key.support_time_frame();

        (built.saturating_add(entity.depreciation()) > horizon_end).then(|| {
            Ok(RestValueTuple {
                unit: key.unit(),
                built,
            })
        })
    })
}

/// Operational tuples for units installed before the horizon.
///
/// The original build year of such units is unknown, so they age from the first time frame of
/// the horizon and stay valid for their `lifetime`.
pub fn installed_tuples<'a, K, V, I>(
    installed: I,
    table: &'a EntityTable<K, V>,
    time_frames: &'a TimeFrames,
) -> impl Iterator<Item = Result<InstalledTuple<K::Unit>, ModelError>> + 'a
where
    K: EntityKey + 'a,
    V: Lifespan + 'a,
    I: IntoIterator<Item = &'a K>,
    I::IntoIter: 'a,
{
    let horizon_start = time_frames.min();
    installed
        .into_iter()
        .flat_map(move |key| match lookup(table, key) {
            Err(err) => Either::Left(iter::once(Err(err))),
            Ok(entity) => {
                let valid_until = horizon_start.saturating_add(entity.lifetime());
                let unit = key.unit();
                Either::Right(
                    time_frames
                        .iter_with_next()
                        .filter(move |&(stf, next)| serves(stf, next, valid_until))
                        .map(move |(stf, _)| {
                            Ok(InstalledTuple {
                                unit: unit.clone(),
                                operating: stf,
                            })
                        }),
                )
            }
        })
}

/// Keys of units installed before the horizon: those in the first time frame with capacity
pub fn installed_keys<'a, K, V>(
    table: &'a EntityTable<K, V>,
    time_frames: &TimeFrames,
) -> impl Iterator<Item = &'a K> + 'a
where
    K: EntityKey,
    V: Lifespan,
{
    let horizon_start = time_frames.min();
    table
        .iter()
        .filter(move |(key, entity)| {
            key.support_time_frame() == horizon_start && entity.installed_capacity() > 0.0
        })
        .map(|(key, _)| key)
}
