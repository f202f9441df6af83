use std::ops::Range;

use flowramp::config::Settings;

pub(in crate::entry) struct VariationPlan {
    pub(super) settings: Settings,
    pub(super) schedule: Vec<usize>,
    pub(super) upload_manifest: bool,
}

pub(in crate::entry) enum RunPlan {
    Variation(VariationPlan),
    FlowUp {
        settings: Settings,
        range: Range<usize>,
    },
    FlowDown {
        settings: Settings,
        range: Range<usize>,
    },
    StopAll(Settings),
}
