//! Key → label normalization
//!
//! Case files use snake_case or camelCase keys. Before a key is shown to a
//! reader it goes through [`KeyLabels::normalize`]:
//!
//! 1. Table lookup (exact key, then lowercased key) → curated label.
//!    Keys listed as ambiguous keep the original key in parentheses,
//!    e.g. `age` → `Возраст (age)`.
//! 2. Text that already is a label is returned unchanged, so normalizing
//!    twice is a no-op.
//! 3. Anything else is split into words on `_`, `-`, whitespace and
//!    camelCase boundaries; words are lowercased, the first one is
//!    capitalized and `id` becomes `ID`.
//!
//! The built-in table is immutable and built once per process; callers that
//! need extra labels derive a new table with [`KeyLabels::with_overrides`].

use once_cell::sync::Lazy;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

const DEFAULT_KEY_LABELS: &[(&str, &str)] = &[
    // patient
    ("name", "Имя"),
    ("full_name", "ФИО"),
    ("age", "Возраст"),
    ("gender", "Пол"),
    ("sex", "Пол"),
    ("occupation", "Профессия"),
    ("weight", "Вес"),
    ("height", "Рост"),
    // presentation
    ("presentation", "Жалобы и анамнез"),
    ("chief_complaint", "Главная жалоба"),
    ("history", "Анамнез"),
    ("symptoms", "Симптомы"),
    ("pain_location", "Локализация боли"),
    ("pain_character", "Характер боли"),
    ("pain_intensity", "Интенсивность боли"),
    ("onset", "Начало"),
    ("duration", "Длительность"),
    // diagnosis and treatment
    ("diagnosis", "Диагноз"),
    ("correct_answers", "Правильные ответы"),
    ("primary", "Основной диагноз"),
    ("differential", "Дифференциальный диагноз"),
    ("icd10", "Код МКБ-10"),
    ("treatment", "Лечение"),
    ("medications", "Препараты"),
    ("procedures", "Процедуры"),
    ("dose", "Доза"),
    ("frequency", "Кратность"),
    ("route", "Путь введения"),
    // vitals
    ("temp", "Температура"),
    ("temperature", "Температура"),
    ("hr", "ЧСС"),
    ("heart_rate", "ЧСС"),
    ("pulse", "Пульс"),
    ("rr", "ЧДД"),
    ("respiratory_rate", "ЧДД"),
    ("bp", "Артериальное давление"),
    ("blood_pressure", "Артериальное давление"),
    ("bp_systolic", "Систолическое АД"),
    ("bp_diastolic", "Диастолическое АД"),
    ("spo2", "SpO2"),
    // laboratory parameters
    ("wbc", "Лейкоциты"),
    ("hgb", "Гемоглобин"),
    ("hemoglobin", "Гемоглобин"),
    ("plt", "Тромбоциты"),
    ("platelets", "Тромбоциты"),
    ("rbc", "Эритроциты"),
    ("neutrophils", "Нейтрофилы"),
    ("lymphocytes", "Лимфоциты"),
    ("esr", "СОЭ"),
    ("glucose", "Глюкоза"),
    ("creatinine", "Креатинин"),
    ("alt", "АЛТ"),
    ("ast", "АСТ"),
    ("crp", "СРБ"),
    ("protein", "Белок"),
    // generic fields
    ("case_id", "ID случая"),
    ("test_id", "ID теста"),
    ("title", "Название"),
    ("category", "Категория"),
    ("description", "Описание"),
    ("notes", "Заметки"),
    ("comments", "Комментарии"),
    ("results", "Результаты"),
    ("value", "Значение"),
    ("unit", "Единицы"),
    ("reference", "Норма"),
    ("status", "Статус"),
    ("note", "Примечание"),
    ("date", "Дата"),
    ("mode", "Режим"),
];

const DEFAULT_GROUP_LABELS: &[(&str, &str)] = &[
    ("cbc", "CBC"),
    ("biochemistry", "Биохимический анализ крови"),
    ("urinalysis", "Общий анализ мочи"),
    ("vital_signs", "Витальные показатели"),
    ("abdominal_exam", "Осмотр живота"),
    ("chest_exam", "Аускультация легких"),
    ("heart_exam", "Аускультация сердца"),
    ("ultrasound_abdomen", "УЗИ органов брюшной полости"),
    ("xray_chest", "Рентгенография органов грудной клетки"),
    ("ct_abdomen", "КТ органов брюшной полости"),
];

const DEFAULT_LAB_KEYS: &[&str] = &[
    "wbc",
    "hgb",
    "hemoglobin",
    "plt",
    "platelets",
    "rbc",
    "neutrophils",
    "lymphocytes",
    "esr",
    "glucose",
    "creatinine",
    "alt",
    "ast",
    "crp",
    "protein",
];

const DEFAULT_AMBIGUOUS: &[&str] = &["age"];

static DEFAULT_LABELS: Lazy<Arc<KeyLabels>> = Lazy::new(|| Arc::new(KeyLabels::builtin()));

/// Additional labels layered over the built-in table.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LabelOverrides {
    pub keys: HashMap<String, String>,
    pub groups: HashMap<String, String>,
    pub ambiguous: Vec<String>,
    pub lab_keys: Vec<String>,
}

/// Immutable key → label table.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyLabels {
    keys: HashMap<String, String>,
    groups: HashMap<String, String>,
    ambiguous: HashSet<String>,
    lab_keys: HashSet<String>,
}

impl KeyLabels {
    fn builtin() -> Self {
        KeyLabels {
            keys: to_map(DEFAULT_KEY_LABELS),
            groups: to_map(DEFAULT_GROUP_LABELS),
            ambiguous: DEFAULT_AMBIGUOUS.iter().map(|k| k.to_string()).collect(),
            lab_keys: DEFAULT_LAB_KEYS.iter().map(|k| k.to_string()).collect(),
        }
    }

    /// The process-wide built-in table.
    pub fn defaults() -> Arc<KeyLabels> {
        Arc::clone(&DEFAULT_LABELS)
    }

    /// An empty table: every key goes through the generic word splitter.
    pub fn empty() -> Self {
        KeyLabels {
            keys: HashMap::new(),
            groups: HashMap::new(),
            ambiguous: HashSet::new(),
            lab_keys: HashSet::new(),
        }
    }

    /// Derive a new table with `overrides` layered on top of this one.
    pub fn with_overrides(&self, overrides: &LabelOverrides) -> KeyLabels {
        let mut labels = self.clone();
        for (key, label) in &overrides.keys {
            labels.keys.insert(key.clone(), label.clone());
        }
        for (key, label) in &overrides.groups {
            labels.groups.insert(key.clone(), label.clone());
        }
        labels.ambiguous.extend(overrides.ambiguous.iter().cloned());
        labels.lab_keys.extend(overrides.lab_keys.iter().cloned());
        labels
    }

    /// Readable label for `key`.
    pub fn normalize(&self, key: &str) -> String {
        if let Some((canonical, label)) = lookup(&self.keys, key) {
            if self.ambiguous.contains(canonical) {
                return format!("{label} ({key})");
            }
            return label.to_string();
        }
        if self.is_label(key) {
            return key.to_string();
        }
        humanize(key)
    }

    /// Heading for a test group (`cbc` → `CBC`); falls back to [`Self::normalize`].
    pub fn group_label(&self, key: &str) -> String {
        match lookup(&self.groups, key) {
            Some((_, label)) => label.to_string(),
            None => self.normalize(key),
        }
    }

    /// Whether `key` names a known group of tests (cbc, urinalysis, …).
    pub fn is_test_group(&self, key: &str) -> bool {
        lookup(&self.groups, key).is_some()
    }

    /// Whether `key` names a known laboratory parameter (wbc, neutrophils, …).
    pub fn is_lab_key(&self, key: &str) -> bool {
        self.lab_keys.contains(key) || self.lab_keys.contains(&key.to_lowercase())
    }

    /// Whether `text` is already a label produced by this table.
    pub fn is_label(&self, text: &str) -> bool {
        if self.keys.values().any(|l| l == text) || self.groups.values().any(|l| l == text) {
            return true;
        }
        // "<label> (<key>)" as produced for ambiguous keys
        let Some(stripped) = text.strip_suffix(')') else {
            return false;
        };
        let Some((label, key)) = stripped.rsplit_once(" (") else {
            return false;
        };
        matches!(lookup(&self.keys, key), Some((_, l)) if l == label)
    }
}

impl Default for KeyLabels {
    fn default() -> Self {
        Self::builtin()
    }
}

fn to_map(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn lookup<'t>(table: &'t HashMap<String, String>, key: &str) -> Option<(&'t str, &'t str)> {
    if let Some((k, v)) = table.get_key_value(key) {
        return Some((k.as_str(), v.as_str()));
    }
    let lower = key.to_lowercase();
    if let Some((k, v)) = table.get_key_value(&lower) {
        return Some((k.as_str(), v.as_str()));
    }
    // `painLocation`, `Pain location` and `pain_location` share one entry
    let snake = split_words(key).join("_").to_lowercase();
    table
        .get_key_value(&snake)
        .map(|(k, v)| (k.as_str(), v.as_str()))
}

/// Generic snake_case / camelCase → phrase conversion.
fn humanize(key: &str) -> String {
    let words = split_words(key);
    if words.is_empty() {
        return key.to_string();
    }
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if lower == "id" {
                "ID".to_string()
            } else if i == 0 {
                capitalize(&lower)
            } else {
                lower
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_words(key: &str) -> Vec<String> {
    let chars: Vec<char> = key.chars().collect();
    let mut words = Vec::new();
    let mut current = String::new();

    for (i, &c) in chars.iter().enumerate() {
        if c == '_' || c == '-' || c.is_whitespace() {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            continue;
        }
        if c.is_uppercase() && !current.is_empty() {
            let prev = chars[i - 1];
            let next_is_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            let boundary = prev.is_lowercase()
                || prev.is_ascii_digit()
                || (prev.is_uppercase() && next_is_lower);
            if boundary {
                words.push(std::mem::take(&mut current));
            }
        }
        current.push(c);
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
