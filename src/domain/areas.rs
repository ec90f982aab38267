//! Area topology
//!
//! Intake feeds the two service benches; the benches exit to advertising or
//! dispatch, park in the waiting box, or write off to recycling.

use crate::schemas::Area;

/// The canonical ordering of areas, used for listings and reports.
pub const ALL_AREAS: &[Area] = &[
    Area::Intake,
    Area::QuickService,
    Area::DedicatedService,
    Area::WaitingBox,
    Area::AdvertisingBox,
    Area::DispatchBox,
    Area::RecycleBox,
];

/// The unordered pair whose moves skip every gate and form.
pub const BYPASS_PAIR: (Area, Area) = (Area::AdvertisingBox, Area::DispatchBox);

/// Get the 0-based index of an area in [`ALL_AREAS`].
pub fn get_area_index(area: Area) -> usize {
    ALL_AREAS
        .iter()
        .position(|&a| a == area)
        .unwrap_or(usize::MAX)
}

/// True when `{from, to}` is the advertising/dispatch pair, in either order.
pub fn is_bypass_pair(from: Area, to: Area) -> bool {
    let (a, b) = BYPASS_PAIR;
    (from == a && to == b) || (from == b && to == a)
}

/// True when a move leaves one service bench for the other.
///
/// Governs whether a finished exit form is followed by an entry form.
pub fn is_service_to_service(from: Area, to: Area) -> bool {
    from.is_service() && to.is_service() && from != to
}

/// Destinations guarded by the info and QA gates
pub fn is_gated_destination(to: Area) -> bool {
    to.is_exit()
}
