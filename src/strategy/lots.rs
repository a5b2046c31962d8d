// src/strategy/lots.rs

//! Lot-size arithmetic.
//!
//! Filter families ship in boxes that can be broken when closing the box would
//! over-send too much; every other family ships in indivisible kits.

/// How many extra units we accept to close a box instead of breaking it.
///
/// Box of 6: close when 1 or 2 units are missing. Box of 12: close when 1 to 3
/// are missing. Other box sizes are never closed.
pub fn box_closing_tolerance(lot: u32) -> u64 {
    match lot {
        6 => 2,
        12 => 3,
        _ => 0,
    }
}

/// Request size for a box-shipped item.
///
/// Rounds `shortfall` up to the next full box only if that adds no more than
/// [`box_closing_tolerance`] units; otherwise the exact shortfall is requested.
pub fn box_request(shortfall: u64, lot: u32) -> u64 {
    if lot <= 1 {
        return shortfall;
    }
    let lot = u64::from(lot);
    let loose = shortfall % lot;
    if loose == 0 {
        return shortfall;
    }

    let to_close = lot - loose;
    if to_close <= box_closing_tolerance(lot as u32) {
        shortfall + to_close
    } else {
        shortfall
    }
}

/// Request size for a kit-shipped item.
///
/// Ships the smallest amount covering `shortfall` that leaves the destination
/// holding a whole number of kits. The result may exceed the shortfall.
/// Fractional stock is kept as is and the shipment truncated to whole units.
///
/// # Arguments
/// * `shortfall` - Units the destination is missing (already rounded up).
/// * `current_stock` - Physical plus in-transit stock at the destination.
/// * `lot` - Units per kit.
pub fn kit_request(shortfall: u64, current_stock: f64, lot: u32) -> u64 {
    if lot <= 1 {
        return shortfall;
    }
    let lot = f64::from(lot);
    let current = current_stock.max(0.0);

    let kits = ((current + shortfall as f64) / lot).ceil();
    let send = (kits * lot - current).trunc();
    if send > 0.0 {
        send as u64
    } else {
        0
    }
}

/// Units the source keeps back before anything is shippable: one month of its
/// own (yearly) demand, rounded up to whole lots.
pub fn safety_retention(source_yearly_demand: f64, lot: u32) -> u64 {
    let lot = f64::from(lot.max(1));
    let monthly = source_yearly_demand.max(0.0) / 12.0;
    ((monthly / lot).ceil() * lot) as u64
}

/// Whole units the source may ship.
///
/// `floor(min(difference, physical - retained))`, clamped to `[0, physical]`.
pub fn shippable_surplus(signed_difference: f64, physical_stock: f64, retained: u64) -> u64 {
    let physical = physical_stock.max(0.0).floor();
    let candidate = signed_difference.min(physical - retained as f64).floor();
    if candidate <= 0.0 {
        0
    } else {
        candidate.min(physical) as u64
    }
}
