pub mod distribution;

pub use distribution::{
    calculate_waterfall, distribute, hurdle_target, TierName, WaterfallInput, WaterfallResult,
    WaterfallTierResult,
};
