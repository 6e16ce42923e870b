use super::Value;
use rayon::prelude::*;
use spcell_common::Time;

/// One `(time, intensity)` row of an instrument export.
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub(crate) struct Reading {
    pub(crate) time: Time,
    pub(crate) intensity: Value,
}

impl Reading {
    pub(crate) fn new(time: Time, intensity: Value) -> Self {
        Self { time, intensity }
    }
}

/// An ordered run of readings, either the sample or the blank channel.
/// Adjacency is significant: neighbouring sample rows make up one cell event.
#[derive(Default, Clone, Debug, PartialEq)]
pub(crate) struct Series(Vec<Reading>);

impl Series {
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Reading> {
        self.0.iter()
    }

    pub(crate) fn par_iter(&self) -> rayon::slice::Iter<'_, Reading> {
        self.0.par_iter()
    }

    pub(crate) fn intensities(&self) -> impl Iterator<Item = Value> + '_ {
        self.0.iter().map(|reading| reading.intensity)
    }
}

impl FromIterator<Reading> for Series {
    fn from_iter<I: IntoIterator<Item = Reading>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Series {
    type Item = &'a Reading;
    type IntoIter = std::slice::Iter<'a, Reading>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
