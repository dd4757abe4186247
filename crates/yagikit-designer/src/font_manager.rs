//! Font lookup for engraved labels.

use fontdb::{Database, Family, Query, Stretch, Style, Weight};
use std::{
    collections::HashMap,
    sync::{Mutex, OnceLock},
};

fn default_font() -> &'static [u8] {
    include_bytes!("../assets/fonts/dejavu/DejaVuSans-Bold.ttf")
}

fn db() -> &'static Database {
    static DB: OnceLock<Database> = OnceLock::new();
    DB.get_or_init(|| {
        let mut db = Database::new();
        db.load_system_fonts();
        db
    })
}

/// Raw font file for `family`, falling back to a bold sans-serif system
/// face and then to the bundled DejaVu Sans Bold.
pub fn font_data(family: &str) -> &'static [u8] {
    static CACHE: OnceLock<Mutex<HashMap<String, &'static [u8]>>> = OnceLock::new();
    let cache = CACHE.get_or_init(|| Mutex::new(HashMap::new()));

    if let Some(data) = cache.lock().unwrap_or_else(|p| p.into_inner()).get(family) {
        return data;
    }

    let data: &'static [u8] = match load_font_from_system(family) {
        Some(bytes) => Box::leak(bytes.into_boxed_slice()),
        None => {
            tracing::debug!(family, "using the bundled label font");
            default_font()
        }
    };
    cache
        .lock()
        .unwrap_or_else(|p| p.into_inner())
        .insert(family.to_string(), data);
    data
}

fn load_font_from_system(family: &str) -> Option<Vec<u8>> {
    let requested: Vec<Family<'_>> = match family.trim() {
        "" | "Sans" => vec![Family::SansSerif],
        "Serif" => vec![Family::Serif],
        "Monospace" => vec![Family::Monospace],
        other => vec![Family::Name(other), Family::SansSerif],
    };

    let query = Query {
        families: &requested,
        weight: Weight::BOLD,
        stretch: Stretch::Normal,
        style: Style::Normal,
    };

    let id = db().query(&query)?;
    if let Some(face) = db().face(id) {
        tracing::debug!(family, found = ?face.families.first().map(|f| &f.0), "label font");
    }
    db().with_face_data(id, |data, _index| data.to_vec())
}
