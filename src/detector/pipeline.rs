//! Detector pipeline driving staff-line extraction end-to-end.
//!
//! The [`StaffLineDetector`] takes an 8-bit grayscale page and returns the
//! staff systems found on it. Internally it prepares an [`ImageData`]
//! (normalization, optional contrast stretch, binarization, run-length
//! analysis), then runs the fixed component → line front followed by the
//! stage plan built from the parameters.
//!
//! Typical usage:
//! ```no_run
//! use staffline_detector::{DetectorParams, StaffLineDetector};
//! use staffline_detector::image::ImageU8;
//!
//! # fn example(gray: ImageU8) -> Result<(), staffline_detector::ConfigError> {
//! let detector = StaffLineDetector::new(DetectorParams::default())?;
//! let report = detector.detect_with_diagnostics(gray);
//! println!("{} systems, {}", report.systems.len(), report.trace.summary());
//! # Ok(())
//! # }
//! ```
use super::data::ImageData;
use super::params::DetectorParams;
use super::stages::{build_plan, Stage};
use crate::components::{extract_connected_components, normalize_connected_components};
use crate::diagnostics::timing::elapsed_ms;
use crate::diagnostics::{DetectionReport, InputDescriptor, PipelineTrace, StageCounts, StageTiming};
use crate::error::ConfigError;
use crate::image::{BinaryImage, ImageU8};
use crate::lines::{connect_connected_components_to_line, filter_short_lines, prune_small_lines};
use crate::preprocess::{
    has_mid_tones, Binarizer, Enhancer, OtsuBinarizer, PercentileEnhancer, PixelClassifier,
};
use crate::runs::{analyze_runs, horizontal_runs, suppress_vertical_structures, vertical_runs};
use crate::smoothing::{line_fitting, smooth_lines, smooth_lines_advanced};
use crate::systems::{
    normalize_lines_in_system, organize_lines_in_systems, postprocess_staff_systems,
    prune_lines_in_system_with_lowest_intensity,
};
use crate::types::{Line, StaffSystem};
use log::debug;
use rayon::prelude::*;
use std::time::Instant;

/// Staff-line detector holding validated parameters, the stage plan and the
/// preprocessing collaborators.
pub struct StaffLineDetector {
    params: DetectorParams,
    plan: Vec<Stage>,
    binarizer: Box<dyn Binarizer>,
    enhancer: Box<dyn Enhancer>,
}

/// Mutable state threaded through the optional stages.
struct StageState {
    lines: Vec<Line>,
    systems: Vec<StaffSystem>,
    binarized: Option<BinaryImage>,
}

impl StaffLineDetector {
    /// Validate `params` and build the stage plan.
    pub fn new(params: DetectorParams) -> Result<Self, ConfigError> {
        params.validate()?;
        let plan = build_plan(&params);
        let enhancer = PercentileEnhancer::new(
            params.preprocess.low_percentile,
            params.preprocess.high_percentile,
        );
        debug!(
            "StaffLineDetector::new plan=[{}]",
            plan.iter().map(Stage::label).collect::<Vec<_>>().join(", ")
        );
        Ok(Self {
            params,
            plan,
            binarizer: Box::new(OtsuBinarizer),
            enhancer: Box::new(enhancer),
        })
    }

    /// Replace the default Otsu binarizer.
    pub fn with_binarizer(mut self, binarizer: impl Binarizer + 'static) -> Self {
        self.binarizer = Box::new(binarizer);
        self
    }

    /// Replace the default percentile contrast stretch.
    pub fn with_enhancer(mut self, enhancer: impl Enhancer + 'static) -> Self {
        self.enhancer = Box::new(enhancer);
        self
    }

    pub fn params(&self) -> &DetectorParams {
        &self.params
    }

    pub fn plan(&self) -> &[Stage] {
        &self.plan
    }

    /// Prepare a page for the line pipeline.
    ///
    /// The page is normalized to [0, 1], stretched when it has mid-tones and
    /// binarized. Staff geometry is measured on the full ink mask; the
    /// run-length image keeps the horizontal runs of the ink that remains
    /// once tall vertical structure is removed.
    pub fn prepare(&self, gray: ImageU8) -> ImageData {
        let image = gray.to_f32();
        let ink = if has_mid_tones(&image) {
            self.binarizer.binarize(&self.enhancer.enhance(&image))
        } else {
            self.binarizer.binarize(&image)
        };
        let staffs =
            suppress_vertical_structures(&ink, self.params.preprocess.vertical_structure_height);
        let analysis = analyze_runs(&ink, &staffs, self.params.min_length);
        debug!(
            "StaffLineDetector::prepare w={} h={} ink={} kept={} line={} space={}",
            image.w,
            image.h,
            ink.count_foreground(),
            analysis.filtered.count_foreground(),
            analysis.stats.staff_line_height,
            analysis.stats.staff_space_height
        );
        ImageData::new(image, analysis.stats, analysis.filtered)
    }

    /// Detect the staff systems of one page.
    pub fn detect(&self, gray: ImageU8) -> Vec<StaffSystem> {
        self.detect_with_diagnostics(gray).systems
    }

    /// Detect the staff systems of one page and report every stage.
    pub fn detect_with_diagnostics(&self, gray: ImageU8) -> DetectionReport {
        let start = Instant::now();
        let data = self.prepare(gray);
        let prepare_ms = elapsed_ms(start);
        let mut report = self.detect_staff_lines_with_diagnostics(&data);
        report.trace.timings.stages.insert(
            0,
            StageTiming {
                label: "prepare".to_string(),
                elapsed_ms: prepare_ms,
            },
        );
        report.trace.timings.total_ms = elapsed_ms(start);
        report
    }

    /// Detect pages one after another, yielding results as they complete.
    pub fn detect_batch<'a, I>(&'a self, pages: I) -> impl Iterator<Item = Vec<StaffSystem>> + 'a
    where
        I: IntoIterator<Item = ImageU8<'a>>,
        I::IntoIter: 'a,
    {
        pages.into_iter().map(move |page| self.detect(page))
    }

    /// Detect pages using an external pixel classifier for the staff mask.
    ///
    /// Pages are normalized and measured in parallel, then the classifier
    /// predicts all masks at once. The line pipeline runs lazily per page as
    /// the returned iterator advances. The iterator yields one result per
    /// page; a page without a mask, or whose mask size differs, yields no
    /// systems.
    pub fn detect_with_classifier<'a>(
        &'a self,
        pages: &[ImageU8<'_>],
        classifier: &dyn PixelClassifier,
    ) -> impl Iterator<Item = Vec<StaffSystem>> + 'a {
        let start = Instant::now();
        let prepared: Vec<_> = self.in_pool(|| {
            pages
                .par_iter()
                .map(|page| {
                    let image = page.to_f32();
                    let stats = vertical_runs(&self.binarizer.binarize(&image));
                    (image, stats)
                })
                .collect()
        });
        debug!(
            "StaffLineDetector::detect_with_classifier prepared {} pages in {:.2}ms",
            prepared.len(),
            elapsed_ms(start)
        );

        let (images, stats): (Vec<_>, Vec<_>) = prepared.into_iter().unzip();
        let masks = classifier.predict(&images, self.params.line_space_height);
        if masks.len() != images.len() {
            debug!(
                "StaffLineDetector::detect_with_classifier got {} masks for {} pages",
                masks.len(),
                images.len()
            );
        }

        let min_length = self.params.min_length;
        let mut masks = masks.into_iter();
        images
            .into_iter()
            .zip(stats)
            .map(move |(image, stats)| {
                let Some(mask) = masks.next() else {
                    debug!("no classifier mask for page {}x{}, skipping", image.w, image.h);
                    return Vec::new();
                };
                if mask.w != image.w || mask.h != image.h {
                    debug!(
                        "classifier mask {}x{} does not match page {}x{}, skipping",
                        mask.w, mask.h, image.w, image.h
                    );
                    return Vec::new();
                }
                let data = ImageData::new(image, stats, horizontal_runs(&mask, min_length));
                self.detect_staff_lines(&data)
            })
    }

    /// Run the line pipeline on a prepared page.
    pub fn detect_staff_lines(&self, data: &ImageData) -> Vec<StaffSystem> {
        self.detect_staff_lines_with_diagnostics(data).systems
    }

    /// Run the line pipeline on a prepared page and report every stage.
    pub fn detect_staff_lines_with_diagnostics(&self, data: &ImageData) -> DetectionReport {
        let total_start = Instant::now();
        let img = &data.horizontal_runs_img;
        let line_height = data.staff_line_height as f32;
        let space_height = data.staff_space_height as f32;
        debug!(
            "StaffLineDetector::detect_staff_lines start w={} h={} line={} space={}",
            img.w, img.h, data.staff_line_height, data.staff_space_height
        );

        let mut trace = PipelineTrace {
            input: InputDescriptor {
                width: img.w,
                height: img.h,
                staff_line_height: data.staff_line_height,
                staff_space_height: data.staff_space_height,
            },
            plan: self.plan.iter().map(|s| s.label().to_string()).collect(),
            ..Default::default()
        };

        if data.staff_line_height == 0 || img.count_foreground() == 0 {
            debug!("StaffLineDetector::detect_staff_lines no ink in run-length image, skipping");
            trace.timings.total_ms = elapsed_ms(total_start);
            return DetectionReport {
                systems: Vec::new(),
                trace,
            };
        }

        let pre = &self.params.preprocess;
        let components = trace.timings.measure("components", || {
            let raw = extract_connected_components(img, pre.merge_gap);
            normalize_connected_components(&raw, pre.min_component_pixels)
        });
        trace.counts.components = components.len();

        let lines = trace.timings.measure("link", || {
            connect_connected_components_to_line(
                components,
                line_height,
                space_height,
                &self.params.linking,
            )
        });
        trace.counts.candidate_lines = lines.len();

        let lines = filter_short_lines(lines, self.params.line_prune.min_line_span);
        trace.counts.after_length_filter = lines.len();

        let lines = trace.timings.measure("prune_lines", || {
            prune_small_lines(lines, space_height, &self.params.line_prune)
        });
        trace.counts.after_pruning = lines.len();
        debug!(
            "StaffLineDetector::detect_staff_lines components={} lines={} filtered={} pruned={}",
            trace.counts.components,
            trace.counts.candidate_lines,
            trace.counts.after_length_filter,
            trace.counts.after_pruning
        );

        let mut state = StageState {
            lines,
            systems: Vec::new(),
            binarized: None,
        };
        for &stage in &self.plan {
            let start = Instant::now();
            self.run_stage(stage, data, &mut state, &mut trace.counts);
            trace.timings.push(stage.label(), elapsed_ms(start));
            debug!(
                "StaffLineDetector stage {} -> {} systems",
                stage.label(),
                state.systems.len()
            );
        }

        trace.timings.total_ms = elapsed_ms(total_start);
        DetectionReport {
            systems: state.systems,
            trace,
        }
    }

    fn run_stage(
        &self,
        stage: Stage,
        data: &ImageData,
        state: &mut StageState,
        counts: &mut StageCounts,
    ) {
        let img = &data.horizontal_runs_img;
        let line_height = data.staff_line_height as f32;
        let space_height = data.staff_space_height as f32;
        let systems = std::mem::take(&mut state.systems);
        state.systems = match stage {
            Stage::Organize => {
                let lines = std::mem::take(&mut state.lines);
                let outcome = organize_lines_in_systems(
                    &lines,
                    space_height,
                    line_height,
                    self.params.num_line,
                    &self.params.systems,
                );
                counts.systems_organized = outcome.systems.len();
                counts.dropped_seeds = outcome.dropped_seeds;
                outcome.systems
            }
            Stage::PruneSystems => {
                let kept = prune_lines_in_system_with_lowest_intensity(
                    systems,
                    img,
                    line_height,
                    &self.params.systems,
                );
                counts.systems_after_intensity_pruning = kept.len();
                kept
            }
            Stage::Normalize => normalize_lines_in_system(
                systems,
                space_height,
                line_height,
                img,
                &self.params.systems,
            ),
            Stage::Singletons => {
                let lines = std::mem::take(&mut state.lines);
                counts.systems_organized = lines.len();
                counts.systems_after_intensity_pruning = lines.len();
                lines.into_iter().map(|l| StaffSystem::new(vec![l])).collect()
            }
            Stage::PostProcess => {
                let binarized = state
                    .binarized
                    .get_or_insert_with(|| self.binarizer.binarize(&data.image));
                postprocess_staff_systems(
                    systems,
                    line_height,
                    space_height,
                    binarized,
                    &self.params.postprocess,
                )
            }
            Stage::SmoothLowPass(sigma) => smooth_lines(systems, sigma),
            Stage::SmoothAdvanced(window) => smooth_lines_advanced(systems, window),
            Stage::FitLines(distance) => line_fitting(systems, distance),
        };
    }

    /// Run `f` on a dedicated pool when `processes` is set.
    fn in_pool<T: Send>(&self, f: impl FnOnce() -> T + Send) -> T {
        let Some(threads) = self.params.processes else {
            return f();
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(f),
            Err(err) => {
                debug!("StaffLineDetector: thread pool with {threads} threads unavailable: {err}");
                f()
            }
        }
    }
}
