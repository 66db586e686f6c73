use indicatif::ProgressStyle;

const STAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const STAGE_DONE_TEMPLATE: &str = "{wide_msg}";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    pub fn stage() -> ProgressStyle {
        ProgressStyle::with_template(STAGE_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    pub fn stage_done() -> ProgressStyle {
        ProgressStyle::with_template(STAGE_DONE_TEMPLATE)
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }
}
