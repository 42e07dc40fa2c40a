// src/noyau/conversion.rs
//
// Conversion d'unités par grandeur.
// - Chaque grandeur a une unité de base (m, kg, s, L, m², m/s, octet)
//   et une table de facteurs vers cette base.
// - La température est affine : passage par le degré Celsius.
// - Un nom d'unité hors de la table de la grandeur est une DomainError.
//
// Facteurs : définitions exactes (pouce international, livre avoirdupois,
// gallons US/UK). Données : préfixes SI en ko/Mo..., binaires en Kio/Mio...

use super::erreur::EvalError;
use super::nombre::Number;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Grandeur {
    #[default]
    Longueur,
    Masse,
    Temperature,
    Temps,
    Volume,
    Surface,
    Vitesse,
    Donnees,
}

const LONGUEUR: &[(&str, f64)] = &[
    ("m", 1.0),
    ("km", 1e3),
    ("cm", 1e-2),
    ("mm", 1e-3),
    ("μm", 1e-6),
    ("nm", 1e-9),
    ("in", 0.0254),
    ("ft", 0.3048),
    ("yd", 0.9144),
    ("mi", 1609.344),
    ("nmi", 1852.0),
];

const MASSE: &[(&str, f64)] = &[
    ("kg", 1.0),
    ("g", 1e-3),
    ("mg", 1e-6),
    ("μg", 1e-9),
    ("t", 1e3),
    ("lb", 0.453_592_37),
    ("oz", 0.028_349_523_125),
    ("st", 6.350_293_18),
    ("ct", 2e-4),
];

const TEMPERATURE: &[(&str, f64)] = &[("°C", 1.0), ("°F", 1.0), ("K", 1.0), ("°R", 1.0)];

const TEMPS: &[(&str, f64)] = &[
    ("s", 1.0),
    ("ms", 1e-3),
    ("μs", 1e-6),
    ("ns", 1e-9),
    ("min", 60.0),
    ("h", 3600.0),
    ("j", 86_400.0),
    ("sem", 604_800.0),
    // année de 365 jours
    ("an", 31_536_000.0),
];

const VOLUME: &[(&str, f64)] = &[
    ("L", 1.0),
    ("mL", 1e-3),
    ("m³", 1e3),
    ("cm³", 1e-3),
    ("ft³", 28.316_846_592),
    ("in³", 0.016_387_064),
    ("gal (US)", 3.785_411_784),
    ("gal (UK)", 4.546_09),
    ("pt (US)", 0.473_176_473),
    ("pt (UK)", 0.568_261_25),
];

const SURFACE: &[(&str, f64)] = &[
    ("m²", 1.0),
    ("km²", 1e6),
    ("cm²", 1e-4),
    ("mm²", 1e-6),
    ("ha", 1e4),
    ("ac", 4_046.856_422_4),
    ("ft²", 0.092_903_04),
    ("in²", 0.000_645_16),
    ("mi²", 2_589_988.110_336),
];

const VITESSE: &[(&str, f64)] = &[
    ("m/s", 1.0),
    ("km/h", 1.0 / 3.6),
    ("mph", 0.447_04),
    ("nœud", 1852.0 / 3600.0),
    ("ft/s", 0.3048),
];

const DONNEES: &[(&str, f64)] = &[
    ("o", 1.0),
    ("ko", 1e3),
    ("Mo", 1e6),
    ("Go", 1e9),
    ("To", 1e12),
    ("Kio", 1024.0),
    ("Mio", 1_048_576.0),
    ("Gio", 1_073_741_824.0),
    ("Tio", 1_099_511_627_776.0),
];

impl Grandeur {
    pub const TOUTES: [Grandeur; 8] = [
        Grandeur::Longueur,
        Grandeur::Masse,
        Grandeur::Temperature,
        Grandeur::Temps,
        Grandeur::Volume,
        Grandeur::Surface,
        Grandeur::Vitesse,
        Grandeur::Donnees,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Grandeur::Longueur => "Longueur",
            Grandeur::Masse => "Masse",
            Grandeur::Temperature => "Température",
            Grandeur::Temps => "Temps",
            Grandeur::Volume => "Volume",
            Grandeur::Surface => "Surface",
            Grandeur::Vitesse => "Vitesse",
            Grandeur::Donnees => "Données",
        }
    }

    fn table(self) -> &'static [(&'static str, f64)] {
        match self {
            Grandeur::Longueur => LONGUEUR,
            Grandeur::Masse => MASSE,
            Grandeur::Temperature => TEMPERATURE,
            Grandeur::Temps => TEMPS,
            Grandeur::Volume => VOLUME,
            Grandeur::Surface => SURFACE,
            Grandeur::Vitesse => VITESSE,
            Grandeur::Donnees => DONNEES,
        }
    }

    /// Unités disponibles, dans l'ordre d'affichage (la première est la base).
    pub fn unites(self) -> impl Iterator<Item = &'static str> {
        self.table().iter().map(|(nom, _)| *nom)
    }

    fn facteur(self, unite: &str) -> Result<f64, EvalError> {
        self.table()
            .iter()
            .find(|(nom, _)| *nom == unite)
            .map(|(_, f)| *f)
            .ok_or_else(|| {
                EvalError::domaine(format!("unité inconnue ({}) : {unite}", self.label()))
            })
    }
}

/// Convertit `valeur` de l'unité `de` vers l'unité `vers`, dans la grandeur donnée.
pub fn convertir(valeur: f64, de: &str, vers: &str, grandeur: Grandeur) -> Result<f64, EvalError> {
    if !valeur.is_finite() {
        return Err(EvalError::domaine("conversion : valeur non finie"));
    }
    let fd = grandeur.facteur(de)?;
    let fv = grandeur.facteur(vers)?;

    let v = if grandeur == Grandeur::Temperature {
        depuis_celsius(vers_celsius(valeur, de), vers)
    } else if de == vers {
        valeur
    } else {
        valeur * fd / fv
    };
    Number::Real(v).verifie("conversion")?;
    Ok(v)
}

fn vers_celsius(v: f64, unite: &str) -> f64 {
    match unite {
        "°F" => (v - 32.0) * 5.0 / 9.0,
        "K" => v - 273.15,
        "°R" => (v - 491.67) * 5.0 / 9.0,
        _ => v,
    }
}

fn depuis_celsius(c: f64, unite: &str) -> f64 {
    match unite {
        "°F" => c * 9.0 / 5.0 + 32.0,
        "K" => c + 273.15,
        "°R" => (c + 273.15) * 9.0 / 5.0,
        _ => c,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proche(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * b.abs().max(1.0)
    }

    fn conv(v: f64, de: &str, vers: &str, g: Grandeur) -> f64 {
        convertir(v, de, vers, g).unwrap_or_else(|e| panic!("{v} {de} -> {vers}: {e}"))
    }

    #[test]
    fn facteurs_lineaires() {
        assert!(proche(conv(1.0, "mi", "km", Grandeur::Longueur), 1.609_344));
        assert!(proche(conv(12.0, "in", "ft", Grandeur::Longueur), 1.0));
        assert!(proche(conv(1.0, "lb", "g", Grandeur::Masse), 453.592_37));
        assert!(proche(conv(36.0, "km/h", "m/s", Grandeur::Vitesse), 10.0));
        assert!(proche(conv(1.0, "Kio", "o", Grandeur::Donnees), 1024.0));
        assert!(proche(conv(2.0, "h", "min", Grandeur::Temps), 120.0));
        assert_eq!(conv(7.5, "L", "L", Grandeur::Volume), 7.5);
    }

    #[test]
    fn temperatures_affines() {
        assert!(proche(conv(100.0, "°C", "°F", Grandeur::Temperature), 212.0));
        assert!(proche(conv(32.0, "°F", "K", Grandeur::Temperature), 273.15));
        assert!(proche(conv(0.0, "K", "°R", Grandeur::Temperature), 0.0));
        assert!(proche(conv(-40.0, "°F", "°C", Grandeur::Temperature), -40.0));
    }

    #[test]
    fn aller_retour() {
        for g in Grandeur::TOUTES {
            let unites: Vec<&str> = g.unites().collect();
            for de in &unites {
                for vers in &unites {
                    let aller = conv(123.456, de, vers, g);
                    let retour = conv(aller, vers, de, g);
                    assert!(proche(retour, 123.456), "{g:?} {de} <-> {vers}");
                }
            }
        }
    }

    #[test]
    fn unites_hors_table() {
        assert!(matches!(
            convertir(1.0, "kg", "m", Grandeur::Longueur),
            Err(EvalError::DomainError(_))
        ));
        assert!(matches!(
            convertir(f64::NAN, "m", "km", Grandeur::Longueur),
            Err(EvalError::DomainError(_))
        ));
        assert_eq!(
            convertir(1e308, "To", "o", Grandeur::Donnees),
            Err(EvalError::OverflowError)
        );
    }
}
