// ui.rs - egui front end: controls, grid painter, population stats

use eframe::egui;
use egui::{Color32, Rect, Stroke, Vec2};
use std::time::{Duration, Instant};
use conway_csr::PATTERNS;

use crate::GameOfLife;

impl eframe::App for GameOfLife {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Auto-update if running
        if self.is_running && self.last_update.elapsed() >= self.update_interval {
            self.update_generation();
            self.last_update = Instant::now();
            ctx.request_repaint(); // Ensure continuous updates
        }

        egui::CentralPanel::default().show(ctx, |ui| {
            ui.heading("Conway's Game of Life (sparse matrix x state)");

            // Controls
            ui.horizontal(|ui| {
                let button_text = if self.is_running { "⏸ Pause" } else { "▶ Start" };
                if ui.button(button_text).clicked() {
                    self.is_running = !self.is_running;
                    if self.is_running {
                        self.last_update = Instant::now();
                    }
                }

                if ui.button("⏭ Step").clicked() {
                    self.is_running = false;
                    self.update_generation();
                }

                if ui.button("⏹ Clear").clicked() {
                    self.is_running = false;
                    self.clear_grid();
                }

                if ui.button("🎲 Random").clicked() {
                    self.is_running = false;
                    self.apply_random_pattern();
                }

                ui.separator();

                // Pattern dropdown
                ui.label("Pattern:");
                egui::ComboBox::from_id_source("pattern_selector")
                    .selected_text(PATTERNS[self.selected_pattern].name)
                    .show_ui(ui, |ui| {
                        for (i, pattern) in PATTERNS.iter().enumerate() {
                            ui.selectable_value(&mut self.selected_pattern, i, pattern.name);
                        }
                    });

                if ui.button("Apply Pattern").clicked() {
                    self.is_running = false;
                    self.apply_selected_pattern();
                }

                ui.separator();

                ui.label(format!("Generation: {}", self.generation()));
            });

            ui.separator();

            // Speed control
            ui.horizontal(|ui| {
                ui.label("Speed:");
                let mut speed = 1000.0 / self.update_interval.as_millis().max(1) as f32;
                if ui.add(egui::Slider::new(&mut speed, 0.5..=90.0).suffix(" gen/sec")).changed() {
                    self.update_interval = Duration::from_millis((1000.0 / speed) as u64);
                }

                ui.separator();

                ui.label("Live:");
                ui.color_edit_button_srgba(&mut self.live_color);
                ui.label("Dead:");
                ui.color_edit_button_srgba(&mut self.dead_color);
            });

            ui.separator();

            ui.label(format!(
                "Each generation is one CSR multiply plus one rule pass, split across {} workers.",
                self.workers()
            ));
            ui.label("Click cells to toggle them alive/dead. Use Start/Pause to run the simulation.");
            if let Some(err) = &self.last_error {
                ui.colored_label(Color32::RED, err.as_str());
            }

            ui.separator();

            // Draw only the interior; the dead border is never shown
            let topology = self.frame.topology;
            let (rows, cols) = (topology.height(), topology.width());
            let spacing = 0.5;
            let box_size = (750.0 / rows.max(cols) as f32 - spacing).clamp(2.0, 15.0);

            let start_pos = ui.cursor().min;
            let total_size = Vec2::new(
                (box_size + spacing) * cols as f32 - spacing,
                (box_size + spacing) * rows as f32 - spacing,
            );

            let (response, painter) = ui.allocate_painter(total_size, egui::Sense::click());

            painter.rect_filled(Rect::from_min_size(start_pos, total_size), 0.0, Color32::BLACK);

            let mut clicked_cell = None;
            let click_pos = if !self.is_running && response.clicked() {
                response.interact_pointer_pos()
            } else {
                None
            };

            for display_row in 0..rows {
                for display_col in 0..cols {
                    let grid_row = display_row + 1;  // Map to padded grid
                    let grid_col = display_col + 1;

                    let x = start_pos.x + display_col as f32 * (box_size + spacing);
                    let y = start_pos.y + display_row as f32 * (box_size + spacing);
                    let rect = Rect::from_min_size(egui::pos2(x, y), Vec2::splat(box_size));

                    let cell_color = if self.frame.is_alive(grid_row, grid_col) {
                        self.live_color
                    } else {
                        self.dead_color
                    };

                    painter.rect_filled(rect, 1.0, cell_color);
                    if box_size >= 6.0 {
                        painter.rect_stroke(rect, 1.0, Stroke::new(0.2, Color32::from_gray(60)));
                    }

                    if click_pos.is_some_and(|pos| rect.contains(pos)) {
                        clicked_cell = Some((grid_row, grid_col));
                    }
                }
            }

            if let Some((row, col)) = clicked_cell {
                self.toggle_cell(row, col);
            }

            ui.separator();

            // Statistics (interior only)
            let live_cells = self.frame.population();
            let area = topology.interior_cells();
            ui.horizontal(|ui| {
                ui.label(format!("Live cells: {}", live_cells));
                ui.label(format!("Dead cells: {}", area - live_cells));
                ui.label(format!("Population: {:.1}%", (live_cells as f32 / area as f32) * 100.0));
            });
        });

        // Request repaint if running to keep animation smooth
        if self.is_running {
            ctx.request_repaint();
        }
    }
}
