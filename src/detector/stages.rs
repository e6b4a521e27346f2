use super::params::DetectorParams;
use crate::smoothing::SmoothingMode;

/// Optional step run after the fixed component → line front of the pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stage {
    /// Group lines into systems of `num_line` lines.
    Organize,
    /// Drop systems with weak ink support.
    PruneSystems,
    /// Extend the lines of every system to a common column range.
    Normalize,
    /// Wrap every line into its own system.
    Singletons,
    /// Fill gaps and trace line ends on the binarized page.
    PostProcess,
    SmoothLowPass(f32),
    SmoothAdvanced(usize),
    FitLines(f32),
}

impl Stage {
    pub fn label(&self) -> &'static str {
        match self {
            Stage::Organize => "organize",
            Stage::PruneSystems => "prune_systems",
            Stage::Normalize => "normalize",
            Stage::Singletons => "singletons",
            Stage::PostProcess => "post_process",
            Stage::SmoothLowPass(_) => "smooth_lowpass",
            Stage::SmoothAdvanced(_) => "smooth_advanced",
            Stage::FitLines(_) => "fit_lines",
        }
    }
}

/// Stage sequence selected by `params`. Built once per detector.
pub fn build_plan(params: &DetectorParams) -> Vec<Stage> {
    let grouped = params.num_line > 1;
    let mut plan = Vec::new();
    if grouped {
        plan.push(Stage::Organize);
        plan.push(Stage::PruneSystems);
        if params.line_extension {
            plan.push(Stage::Normalize);
        }
    } else {
        plan.push(Stage::Singletons);
    }
    if params.post_process {
        plan.push(Stage::PostProcess);
        if grouped && params.line_extension {
            plan.push(Stage::Normalize);
        }
    }
    match params.smooth_lines {
        SmoothingMode::Off => {}
        SmoothingMode::LowPass => plan.push(Stage::SmoothLowPass(params.smooth_value_lowpass)),
        SmoothingMode::Advanced => plan.push(Stage::SmoothAdvanced(params.smooth_value_adv)),
    }
    if params.line_fit_distance > 0.0 {
        plan.push(Stage::FitLines(params.line_fit_distance));
    }
    plan
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_plan() {
        let plan = build_plan(&DetectorParams::default());
        assert_eq!(
            plan,
            vec![
                Stage::Organize,
                Stage::PruneSystems,
                Stage::Normalize,
                Stage::PostProcess,
                Stage::Normalize,
                Stage::FitLines(0.5),
            ]
        );
    }

    #[test]
    fn single_line_plan_skips_grouping() {
        let params = DetectorParams {
            num_line: 1,
            smooth_lines: SmoothingMode::Advanced,
            line_fit_distance: 0.0,
            ..Default::default()
        };
        assert_eq!(
            build_plan(&params),
            vec![Stage::Singletons, Stage::PostProcess, Stage::SmoothAdvanced(25)]
        );
    }

    #[test]
    fn minimal_plan() {
        let params = DetectorParams {
            line_extension: false,
            post_process: false,
            smooth_lines: SmoothingMode::LowPass,
            line_fit_distance: 0.0,
            ..Default::default()
        };
        assert_eq!(
            build_plan(&params),
            vec![Stage::Organize, Stage::PruneSystems, Stage::SmoothLowPass(5.0)]
        );
    }
}
