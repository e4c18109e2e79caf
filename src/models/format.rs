// ============================================================================
// Formatage monétaire (en-US, USD)
// ============================================================================
// Deux notations sont utilisées dans le tableau :
// - standard : "$1,234.56" (prix)
// - compacte : "$1.5B" (capitalisation, volume)
//
// CONCEPTS RUST :
// 1. Fonctions pures : pas d'état, faciles à tester
// 2. f64 et arrondis : round(), log10(), powi()
// 3. &str vs String : on prend des &str, on retourne des String owned
// ============================================================================

/// Texte affiché quand une valeur numérique est absente ou invalide
pub const NOT_AVAILABLE: &str = "N/A";

/// Unités de la notation compacte, de la plus petite à la plus grande
const COMPACT_UNITS: [(f64, &str); 5] = [
    (1.0, ""),
    (1e3, "K"),
    (1e6, "M"),
    (1e9, "B"),
    (1e12, "T"),
];

/// Parse un champ numérique de l'API (les nombres arrivent sous forme de texte)
///
/// Retourne None pour un texte vide, non numérique ou infini.
pub fn parse_numeric(text: &str) -> Option<f64> {
    text.trim()
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}

/// Formate un montant en dollars, notation standard
///
/// # Exemple
/// format_usd(1234567.891) == "$1,234,567.89"
pub fn format_usd(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let fixed = to_fixed(value.abs(), 2);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));

    // Pas de "-$0.00" pour les très petites valeurs négatives
    let sign = if value < 0.0 && fixed != "0.00" { "-" } else { "" };

    format!("{}${}.{}", sign, group_thousands(int_part), frac_part)
}

/// Formate un montant en dollars, notation compacte (K, M, B, T)
///
/// Règles d'arrondi :
/// - moins de 100 dans l'unité choisie : 2 chiffres significatifs ($1.5B, $12K)
/// - sinon : entier ($123M)
/// - un arrondi qui atteint 1000 passe à l'unité suivante (999 999 -> $1M)
pub fn format_usd_compact(value: f64) -> String {
    if !value.is_finite() {
        return NOT_AVAILABLE.to_string();
    }

    let abs = value.abs();

    // CONCEPT RUST : rposition
    // - Cherche depuis la fin le premier élément qui matche
    // - Ici : la plus grande unité inférieure ou égale à la valeur
    let mut unit = COMPACT_UNITS
        .iter()
        .rposition(|(scale, _)| abs >= *scale)
        .unwrap_or(0);

    let (mut rounded, mut decimals) = round_compact(abs / COMPACT_UNITS[unit].0);
    if rounded >= 1000.0 && unit + 1 < COMPACT_UNITS.len() {
        unit += 1;
        (rounded, decimals) = round_compact(abs / COMPACT_UNITS[unit].0);
    }

    let number = trim_fraction(format!("{:.*}", decimals, rounded));
    let sign = if value < 0.0 && rounded != 0.0 { "-" } else { "" };

    format!("{}${}{}", sign, number, COMPACT_UNITS[unit].1)
}

/// Formate une valeur numérique textuelle en notation standard
pub fn format_usd_text(text: &str) -> String {
    parse_numeric(text)
        .map(format_usd)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formate une valeur numérique textuelle en notation compacte
pub fn format_usd_compact_text(text: &str) -> String {
    parse_numeric(text)
        .map(format_usd_compact)
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formate un nombre avec exactement `decimals` décimales
///
/// # Exemple
/// format_fixed("2.3456789", 3) == "2.346"
pub fn format_fixed(text: &str, decimals: usize) -> String {
    parse_numeric(text)
        .map(|value| to_fixed(value, decimals))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Formate un nombre simple avec séparateurs de milliers (ex: supply)
pub fn format_amount(text: &str) -> String {
    match parse_numeric(text) {
        Some(value) => {
            let fixed = to_fixed(value.abs(), 0);
            let sign = if value < 0.0 && fixed != "0" { "-" } else { "" };
            format!("{}{}", sign, group_thousands(&fixed))
        }
        None => NOT_AVAILABLE.to_string(),
    }
}

/// Écrit `value` avec `decimals` décimales, demi-valeurs arrondies loin de zéro
///
/// `{:.N}` arrondit les demi-valeurs exactes au pair ("0.125" -> "0.12") :
/// on arrondit d'abord avec f64::round ("0.125" -> "0.13").
fn to_fixed(value: f64, decimals: usize) -> String {
    let factor = 10f64.powi(decimals as i32);
    let rounded = (value * factor).round() / factor;

    if rounded == 0.0 {
        // Pas de "-0.000"
        return format!("{:.*}", decimals, 0.0);
    }
    format!("{:.*}", decimals, rounded)
}

/// Arrondit une valeur déjà ramenée dans son unité
///
/// Retourne la valeur arrondie et le nombre de décimales à afficher.
fn round_compact(value: f64) -> (f64, usize) {
    if value == 0.0 {
        return (0.0, 0);
    }
    if value >= 100.0 {
        return (value.round(), 0);
    }

    // 2 chiffres significatifs : 1 décimale pour [1, 10), 0 pour [10, 100)
    let magnitude = value.log10().floor() as i32;
    let decimals = (1 - magnitude).max(0) as usize;
    let factor = 10f64.powi(decimals as i32);

    ((value * factor).round() / factor, decimals)
}

/// Supprime les zéros inutiles après la virgule ("1.50" -> "1.5", "1.0" -> "1")
fn trim_fraction(number: String) -> String {
    if !number.contains('.') {
        return number;
    }
    number
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string()
}

/// Insère une virgule tous les 3 chiffres ("1234567" -> "1,234,567")
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);

    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    grouped
}

// ============================================================================
// Tests unitaires
// ============================================================================
