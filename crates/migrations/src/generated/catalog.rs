//! Auto-generated by `cargo xtask codegen migrations`.
//! Do not edit by hand.

use crate::units;
use fcm_engine::{CatalogEntry, instantiate};

pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        path: "units/freecad_1_0/attachment_support.rs",
        type_name: "AttachmentSupport",
        factory: instantiate::<units::freecad_1_0::attachment_support::AttachmentSupport>,
    },
    CatalogEntry {
        path: "units/freecad_1_1/color_alpha.rs",
        type_name: "ColorTransparencyToAlpha",
        factory: instantiate::<units::freecad_1_1::color_alpha::ColorTransparencyToAlpha>,
    },
];
