mod sample_tip;

pub use sample_tip::{
    SampleTipContext, SampleTipJob, process_sample_tip_job, sample_tip_schedule,
};
