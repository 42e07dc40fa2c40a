// src/app/vue.rs
//
// Vue (UI egui) — natif + web
// ---------------------------
// Objectifs :
// - Même AppCalc (etat.rs) pour natif + wasm
// - Pavé : chaque touche est un événement de la machine de saisie
// - Formule : Enter évalue (quand le champ est focus), dans le mode d'angle choisi
// - Tactile : gros boutons, focus redonné après clic (focus_entree)
//
// Note :
// - PAS de Key::NumEnter (n'existe pas dans egui 0.33.x)

use eframe::egui;

use smartcalc::{format_number, AngleMode, Grandeur, Number, NumberFormat};

use super::etat::AppCalc;

impl AppCalc {
    /// UI principale : à appeler depuis eframe::App::update(...)
    pub fn ui(&mut self, ui: &mut egui::Ui) {
        // Densité "calc"
        ui.spacing_mut().item_spacing = egui::vec2(6.0, 6.0);

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.heading("Calculatrice scientifique");
                ui.add_space(6.0);

                self.ui_reglages(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_pave(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_formule(ui);

                ui.add_space(8.0);
                self.ui_resultat(ui);

                ui.add_space(8.0);
                ui.separator();
                ui.add_space(8.0);

                self.ui_memoire(ui);

                ui.add_space(8.0);
                self.ui_conversion(ui);
            });
    }

    fn ui_reglages(&mut self, ui: &mut egui::Ui) {
        ui.horizontal_wrapped(|ui| {
            ui.label("Angle :");
            for m in AngleMode::TOUS {
                ui.selectable_value(&mut self.mode, m, m.label());
            }

            ui.separator();

            ui.label("Format :");
            for f in [
                NumberFormat::Normal,
                NumberFormat::Scientific,
                NumberFormat::Engineering,
            ] {
                if ui.selectable_label(self.format == f, f.label()).clicked() {
                    self.set_format(f);
                }
            }

            ui.separator();

            let mut p = self.precision as u32;
            let resp = ui.add(
                egui::DragValue::new(&mut p)
                    .speed(1)
                    .range(0..=15)
                    .suffix(" déc."),
            );
            if resp.changed() {
                self.set_precision(p as usize);
            }

            ui.separator();

            let mut promotion = self.evaluateur.config().allow_complex_promotion;
            if ui
                .checkbox(&mut promotion, "complexes")
                .on_hover_text("sqrt(-1), ln(-1)... donnent un complexe au lieu d'une erreur")
                .changed()
            {
                self.evaluateur.set_allow_complex_promotion(promotion);
            }

            ui.separator();

            if ui
                .button("Enregistrer")
                .on_hover_text("Écrit ces réglages dans config.toml")
                .clicked()
            {
                self.sauver_reglages();
            }
            if !self.statut.is_empty() {
                ui.weak(&self.statut);
            }
        });
    }

    /* ------------------------ Pavé (machine de saisie) ------------------------ */

    fn ui_pave(&mut self, ui: &mut egui::Ui) {
        Self::champ_monospace(ui, "pave_expression", self.saisie.display_expression(), 1);
        ui.add_space(2.0);
        ui.push_id("pave_valeur", |ui| {
            ui.heading(self.saisie.display_value());
        });
        ui.add_space(6.0);

        egui::Grid::new("pave_numerique")
            .num_columns(4)
            .spacing([6.0, 6.0])
            .show(ui, |ui| {
                self.touche(ui, "C", Touche::Efface);
                self.touche(ui, "±", Touche::Signe);
                self.touche(ui, "%", Touche::Pourcent);
                self.touche(ui, "÷", Touche::Op('÷'));
                ui.end_row();

                self.touche(ui, "7", Touche::Chiffre('7'));
                self.touche(ui, "8", Touche::Chiffre('8'));
                self.touche(ui, "9", Touche::Chiffre('9'));
                self.touche(ui, "×", Touche::Op('×'));
                ui.end_row();

                self.touche(ui, "4", Touche::Chiffre('4'));
                self.touche(ui, "5", Touche::Chiffre('5'));
                self.touche(ui, "6", Touche::Chiffre('6'));
                self.touche(ui, "-", Touche::Op('-'));
                ui.end_row();

                self.touche(ui, "1", Touche::Chiffre('1'));
                self.touche(ui, "2", Touche::Chiffre('2'));
                self.touche(ui, "3", Touche::Chiffre('3'));
                self.touche(ui, "+", Touche::Op('+'));
                ui.end_row();

                self.touche(ui, "0", Touche::Chiffre('0'));
                self.touche(ui, ".", Touche::Point);
                ui.label("");
                self.touche(ui, "=", Touche::Egal);
                ui.end_row();
            });
    }

    fn touche(&mut self, ui: &mut egui::Ui, label: &str, t: Touche) {
        let resp = ui.add_sized([56.0, 36.0], egui::Button::new(label));
        if !resp.clicked() {
            return;
        }

        match t {
            Touche::Chiffre(d) => self.saisie.append_digit(d),
            Touche::Point => self.saisie.append_decimal(),
            Touche::Op(op) => self.saisie.set_operator(op),
            Touche::Signe => self.saisie.toggle_sign(),
            Touche::Pourcent => self.saisie.percent(),
            Touche::Efface => self.saisie.clear(),
            Touche::Egal => {
                self.saisie.equals_with(&mut self.evaluateur);
                if !self.saisie.is_error() {
                    self.sauver_historique();
                }
            }
        }
    }

    /* ------------------------ Formule scientifique ------------------------ */

    fn ui_formule(&mut self, ui: &mut egui::Ui) {
        ui.label("Formule :");

        // IMPORTANT : id stable + focus contrôlé
        let resp = ui.add(
            egui::TextEdit::singleline(&mut self.entree)
                .desired_width(ui.available_width())
                .hint_text("Ex: sin(30) + sqrt(2)^2, comb(10, 3), ans/2")
                .id_salt("entree_edit")
                .code_editor(),
        );

        if self.focus_entree {
            resp.request_focus();
            self.focus_entree = false;
        }

        // Enter évalue (seulement si le champ est focus)
        let enter = ui.input(|i| i.key_pressed(egui::Key::Enter));
        if resp.has_focus() && enter {
            self.eval_via_noyau();
        }

        ui.add_space(6.0);

        ui.horizontal_wrapped(|ui| {
            for (label, texte) in [
                ("(", "("),
                (")", ")"),
                ("^", "^"),
                ("π", "pi"),
                ("e", "e"),
                ("ans", "ans"),
                ("√", "sqrt("),
                ("sin", "sin("),
                ("cos", "cos("),
                ("tan", "tan("),
                ("ln", "ln("),
                ("log", "log("),
                ("n!", "factorial("),
            ] {
                if ui.add_sized([46.0, 28.0], egui::Button::new(label)).clicked() {
                    self.entree.push_str(texte);
                    self.focus_entree = true;
                }
            }

            ui.separator();

            if ui
                .add_sized([46.0, 28.0], egui::Button::new("C"))
                .on_hover_text("Efface seulement la formule")
                .clicked()
            {
                self.clear_entree();
            }
            if ui
                .add_sized([46.0, 28.0], egui::Button::new("AC"))
                .on_hover_text("Remise à zéro totale")
                .clicked()
            {
                self.reset_total();
            }

            ui.add_space(10.0);

            if ui.add_sized([64.0, 28.0], egui::Button::new("=")).clicked() {
                self.eval_via_noyau();
            }
        });
    }

    fn ui_resultat(&mut self, ui: &mut egui::Ui) {
        ui.label(format!("Résultat ({}) :", self.mode.label()));
        Self::champ_monospace(ui, "resultat_out", &self.resultat, 1);

        if !self.facteurs.is_empty() {
            ui.add_space(4.0);
            ui.monospace(&self.facteurs);
        }

        if !self.erreur.is_empty() {
            ui.add_space(6.0);
            ui.colored_label(ui.visuals().error_fg_color, &self.erreur);
        }
    }

    /* ------------------------ Mémoire ------------------------ */

    fn ui_memoire(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("M+").on_hover_text("Ajoute le résultat").clicked() {
                self.memoire(false);
            }
            if ui.button("M-").on_hover_text("Retranche le résultat").clicked() {
                self.memoire(true);
            }
            if ui.button("MR").on_hover_text("Insère la mémoire dans la formule").clicked() {
                let m = self.evaluateur.memory_recall();
                let texte = format_number(Number::Real(m), NumberFormat::Normal, 15);
                self.entree.push_str(&texte);
                self.focus_entree = true;
            }
            if ui.button("MC").clicked() {
                self.evaluateur.memory_clear();
            }

            ui.separator();

            let m = self.evaluateur.memory_recall();
            ui.monospace(format!(
                "M = {}",
                format_number(Number::Real(m), self.format, self.precision)
            ));

            ui.separator();

            if ui
                .button("facteurs")
                .on_hover_text("Décompose le résultat en facteurs premiers")
                .clicked()
            {
                self.decomposer();
            }
        });
    }

    /* ------------------------ Conversion d'unités ------------------------ */

    fn ui_conversion(&mut self, ui: &mut egui::Ui) {
        egui::CollapsingHeader::new("Conversion d'unités")
            .default_open(false)
            .show(ui, |ui| {
                let mut grandeur = self.conversion.grandeur;
                egui::ComboBox::from_id_salt("conv_grandeur")
                    .selected_text(grandeur.label())
                    .show_ui(ui, |ui| {
                        for g in Grandeur::TOUTES {
                            ui.selectable_value(&mut grandeur, g, g.label());
                        }
                    });
                if grandeur != self.conversion.grandeur {
                    self.conversion.set_grandeur(grandeur);
                }

                let mut convertir = false;
                ui.horizontal_wrapped(|ui| {
                    let resp = ui.add(
                        egui::TextEdit::singleline(&mut self.conversion.entree)
                            .desired_width(120.0)
                            .hint_text("valeur")
                            .id_salt("conv_entree"),
                    );
                    if resp.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter)) {
                        convertir = true;
                    }

                    let g = self.conversion.grandeur;
                    Self::choix_unite(ui, "conv_de", g, &mut self.conversion.de);
                    ui.label("→");
                    Self::choix_unite(ui, "conv_vers", g, &mut self.conversion.vers);

                    if ui.button("Convertir").clicked() {
                        convertir = true;
                    }
                });
                if convertir {
                    self.convertir();
                }

                if !self.conversion.resultat.is_empty() {
                    Self::champ_monospace(ui, "conv_out", &self.conversion.resultat, 1);
                }
            });
    }

    fn choix_unite(ui: &mut egui::Ui, id: &str, g: Grandeur, unite: &mut &'static str) {
        egui::ComboBox::from_id_salt(id)
            .selected_text(*unite)
            .show_ui(ui, |ui| {
                for u in g.unites() {
                    ui.selectable_value(unite, u, u);
                }
            });
    }

    /* ------------------------ Historique ------------------------ */

    pub fn ui_historique(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            ui.heading("Historique");
            if ui.small_button("vider").clicked() {
                self.evaluateur.clear_history();
                self.sauver_historique();
            }
        });
        ui.separator();

        let mut reprise: Option<String> = None;

        egui::ScrollArea::vertical()
            .auto_shrink([false, false])
            .show(ui, |ui| {
                // plus récent en haut
                for e in self.evaluateur.history().iter().rev() {
                    let valeur = format_number(e.result, self.format, self.precision);
                    let resp = ui
                        .add(egui::Button::new(format!("{} = {valeur}", e.expression)))
                        .on_hover_text(format!(
                            "{} · {}",
                            e.angle_mode.label(),
                            e.timestamp.format("%Y-%m-%d %H:%M:%S")
                        ));
                    if resp.clicked() {
                        reprise = Some(e.expression.clone());
                    }
                }
            });

        if let Some(expr) = reprise {
            self.entree = expr;
            self.focus_entree = true;
        }
    }

    /// Évalue la formule via le noyau, puis dépose le résultat dans l'état UI.
    fn eval_via_noyau(&mut self) {
        let s = self.entree.trim().to_string();
        if s.is_empty() {
            self.set_erreur("Entrée vide");
            return;
        }

        match self.evaluateur.evaluate(&s, self.mode) {
            Ok(v) => {
                self.set_resultat(v);
                self.sauver_historique();
            }
            Err(e) => self.set_erreur(e.to_string()),
        }
    }

    fn champ_monospace(ui: &mut egui::Ui, id: &str, contenu: &str, rows: usize) {
        // Affichage lecture seule "stable", sans TextEdit interactif.
        egui::Frame::group(ui.style())
            .fill(ui.visuals().extreme_bg_color)
            .show(ui, |ui| {
                ui.push_id(id, |ui| {
                    ui.set_min_width(ui.available_width());
                    ui.set_min_height(
                        rows as f32 * ui.text_style_height(&egui::TextStyle::Monospace),
                    );
                    ui.monospace(contenu);
                });
            });
    }
}

#[derive(Clone, Copy, Debug)]
enum Touche {
    Chiffre(char),
    Point,
    Op(char),
    Signe,
    Pourcent,
    Egal,
    Efface,
}
