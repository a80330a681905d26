//! Text presenters for the breed list and a single breed card.
//!
//! Both render through [`RemoteImage::glyph`], so image states look the same in
//! a list row and on the detail card.

use std::fmt;

use catbreeds_core::{Breed, BreedState, LoadPhase, RemoteImage, Weight};

pub const BUSY_INDICATOR: &str = "Loading breeds...";

const LABEL_WIDTH: usize = 20;
const NAME_WIDTH: usize = 28;

// ── List ──

/// Master list over a state snapshot, one row per breed in response order.
pub struct ListPresenter<'a> {
    state: &'a BreedState,
    images: &'a [RemoteImage],
}

impl<'a> ListPresenter<'a> {
    /// `images[k]` is row `k`'s thumbnail. Rows past the end of `images` render the fallback glyph.
    pub fn new(state: &'a BreedState, images: &'a [RemoteImage]) -> Self {
        Self { state, images }
    }

    pub fn len(&self) -> usize {
        if self.state.is_loading() {
            0
        } else {
            self.state.breeds.len()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn image(&self, row: usize) -> RemoteImage {
        self.images
            .get(row)
            .cloned()
            .unwrap_or_else(|| RemoteImage::new(None))
    }

    /// Open row `row` (0-indexed). The breed is cloned out of the snapshot; nothing is fetched.
    pub fn select(&self, row: usize) -> Option<DetailPresenter> {
        if self.state.is_loading() {
            return None;
        }
        let breed = self.state.breeds.get(row)?.clone();
        Some(DetailPresenter::new(breed, self.image(row)))
    }
}

impl fmt::Display for ListPresenter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.state.phase {
            LoadPhase::Loading => return writeln!(f, "{BUSY_INDICATOR}"),
            LoadPhase::Idle => return writeln!(f, "Breeds not loaded."),
            LoadPhase::Failed(kind) => writeln!(f, "Error: {kind}")?,
            LoadPhase::Loaded => {}
        }

        let breeds = &self.state.breeds;
        if breeds.is_empty() {
            return writeln!(f, "No breeds.");
        }

        write!(f, "Breeds ({})", breeds.len())?;
        if let Some(at) = self.state.fetched_at {
            write!(f, ", fetched {} UTC", at.format("%H:%M:%S"))?;
        }
        writeln!(f)?;
        let index_width = (breeds.len() - 1).to_string().len();
        for (row, breed) in breeds.iter().enumerate() {
            writeln!(
                f,
                "  {:>index_width$}  {}  {:<NAME_WIDTH$} {}",
                row,
                self.image(row).glyph(),
                breed.name,
                breed.origin,
            )?;
        }
        Ok(())
    }
}

// ── Detail ──

/// Card for one breed, holding the record by value.
#[derive(Debug, Clone)]
pub struct DetailPresenter {
    breed: Breed,
    image: RemoteImage,
}

impl DetailPresenter {
    pub fn new(breed: Breed, image: RemoteImage) -> Self {
        Self { breed, image }
    }

    pub fn breed(&self) -> &Breed {
        &self.breed
    }

    pub fn image(&self) -> &RemoteImage {
        &self.image
    }

    /// Replace the image, e.g. once a load resolves.
    pub fn with_image(self, image: RemoteImage) -> Self {
        Self { image, ..self }
    }
}

fn or_dash(s: &str) -> &str {
    if s.trim().is_empty() { "-" } else { s }
}

/// Metric first with imperial in parentheses; units only on the halves present.
fn weight(w: &Weight) -> String {
    match (w.metric.trim(), w.imperial.trim()) {
        ("", "") => "-".to_string(),
        (metric, "") => format!("{metric} kg"),
        ("", imperial) => format!("{imperial} lb"),
        (metric, imperial) => format!("{metric} kg ({imperial} lb)"),
    }
}

impl fmt::Display for DetailPresenter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let b = &self.breed;

        writeln!(f, "=== {} ===", b.name)?;
        match self.image.url() {
            Some(url) => writeln!(f, "{}  {}", self.image.glyph(), url)?,
            None => writeln!(f, "{}", self.image.glyph())?,
        }
        writeln!(f)?;

        writeln!(f, "  {:<LABEL_WIDTH$} {}", "Origin", or_dash(&b.origin))?;
        writeln!(f, "  {:<LABEL_WIDTH$} {}", "Life span", or_dash(&b.life_span))?;
        writeln!(f, "  {:<LABEL_WIDTH$} {}", "Weight", weight(&b.weight))?;
        if let Some(alt) = b.alt_names.as_deref()
            && !alt.trim().is_empty()
        {
            writeln!(f, "  {:<LABEL_WIDTH$} {}", "Also known as", alt.trim())?;
        }
        if !b.country_code.is_empty() {
            writeln!(f, "  {:<LABEL_WIDTH$} {}", "Country code", b.country_code)?;
        }
        writeln!(f)?;

        if !b.description.trim().is_empty() {
            writeln!(f, "{}", b.description.trim())?;
            writeln!(f)?;
        }
        writeln!(f, "Temperament: {}", or_dash(&b.temperament))?;

        let scores: Vec<_> = b
            .trait_scores()
            .into_iter()
            .filter_map(|(label, score)| score.map(|s| (label, s)))
            .collect();
        if !scores.is_empty() {
            writeln!(f)?;
            writeln!(f, "Traits")?;
            for (label, score) in scores {
                writeln!(f, "  {label:<LABEL_WIDTH$} {score}")?;
            }
        }

        let links = b.links();
        if !links.is_empty() {
            writeln!(f)?;
            writeln!(f, "Links")?;
            for (label, url) in links {
                writeln!(f, "  {label:<LABEL_WIDTH$} {url}")?;
            }
        }
        Ok(())
    }
}
