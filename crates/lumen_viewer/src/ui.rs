//! egui overlay: frame statistics and live scene settings.

use lumen_core::config::{GLOBAL_ILLUMINATION_RANGE, MAX_SPHERES, REFLECTIONS_RANGE};
use lumen_core::SceneConfig;

/// Frames-per-second estimate, refreshed twice a second.
#[derive(Debug, Clone, Default)]
pub struct FpsCounter {
    fps: f32,
    frame_count: u32,
    timer: f32,
}

impl FpsCounter {
    /// Count one frame that took `delta_time` seconds.
    pub fn update(&mut self, delta_time: f32) {
        self.frame_count += 1;
        self.timer += delta_time;

        if self.timer >= 0.5 {
            self.fps = self.frame_count as f32 / self.timer;
            self.frame_count = 0;
            self.timer = 0.0;
        }
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Numbers shown in the stats section.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayStats {
    pub sample: u32,
    pub spheres: usize,
    pub objects: usize,
    pub resolution: (u32, u32),
}

/// Overlay state: visibility and the settings being edited.
pub struct Overlay {
    pub visible: bool,
    pub fps: FpsCounter,
    draft: SceneConfig,
}

impl Overlay {
    pub fn new(config: &SceneConfig) -> Self {
        Self {
            visible: true,
            fps: FpsCounter::default(),
            draft: config.clone(),
        }
    }

    /// Draw the panel. Returns a new config when the user changed one.
    pub fn show(&mut self, ctx: &egui::Context, stats: &OverlayStats) -> Option<SceneConfig> {
        if !self.visible {
            return None;
        }

        let mut changed = false;
        let fps = self.fps.fps();
        let draft = &mut self.draft;

        egui::SidePanel::left("stats_panel")
            .default_width(260.0)
            .show(ctx, |ui| {
                ui.heading("Lumen");
                ui.separator();

                ui.label(format!("FPS: {:.1}", fps));
                ui.label(format!("Samples: {}", stats.sample));
                ui.label(format!("Resolution: {}x{}", stats.resolution.0, stats.resolution.1));
                ui.separator();

                ui.collapsing("Scene", |ui| {
                    ui.label(format!("Spheres: {}", stats.spheres));
                    ui.label(format!("Mesh objects: {}", stats.objects));
                });

                ui.separator();

                ui.collapsing("Lighting", |ui| {
                    changed |= ui
                        .add(
                            egui::Slider::new(
                                &mut draft.global_illumination,
                                GLOBAL_ILLUMINATION_RANGE,
                            )
                            .text("Global illumination"),
                        )
                        .changed();
                    changed |= ui
                        .add(
                            egui::Slider::new(&mut draft.reflections, REFLECTIONS_RANGE)
                                .text("Reflections"),
                        )
                        .changed();
                });

                ui.separator();

                ui.collapsing("Spheres", |ui| {
                    ui.horizontal(|ui| {
                        ui.label("Seed");
                        ui.add(egui::DragValue::new(&mut draft.sphere_seed));
                    });
                    ui.add(egui::Slider::new(&mut draft.spheres_max, 0..=MAX_SPHERES).text("Max count"));
                    if ui.button("Regenerate").clicked() {
                        changed = true;
                    }
                });

                ui.separator();

                ui.collapsing("Controls", |ui| {
                    ui.label("W/A/S/D: Move");
                    ui.label("R/F: Move up/down");
                    ui.label("Right Mouse: Look");
                    ui.label("H: Toggle this panel");
                });
            });

        changed.then(|| self.draft.clone())
    }

    /// Reset the edited settings, e.g. after a rejected change.
    pub fn sync(&mut self, config: &SceneConfig) {
        self.draft = config.clone();
    }
}
