//! Garment tech pack (ficha técnica)
//!
//! Production specification grouped by phase: identification, cutting,
//! sewing, trims, print/art, DTF settings and the production grid.
//! Images are embedded as `data:` URIs.

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sow_types::{Error, Result};
use std::str::FromStr;

/// Closed list of options whose wire value is the Portuguese label
pub trait Choice: Sized + Copy + PartialEq + 'static {
    const ALL: &'static [Self];

    fn label(&self) -> &'static str;

    fn from_label(label: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.label() == label)
    }
}

/// Empty or unrecognized labels become `None` instead of failing the document
fn lenient_choice<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Choice,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(T::from_label))
}

fn serialize_choice<S, T>(value: &Option<T>, serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: Serializer,
    T: Choice,
{
    match value {
        Some(choice) => serializer.serialize_str(choice.label()),
        None => serializer.serialize_str(""),
    }
}

/// Predominant print technique
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintTechnique {
    SilkScreen,
    Dtf,
    Sublimation,
}

impl Choice for PrintTechnique {
    const ALL: &'static [Self] = &[Self::SilkScreen, Self::Dtf, Self::Sublimation];

    fn label(&self) -> &'static str {
        match self {
            Self::SilkScreen => "Silk Screen Base D'água",
            Self::Dtf => "DTF - Direct to Film",
            Self::Sublimation => "Sublimação",
        }
    }
}

/// Desired hand feel of the print
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintTouch {
    Soft,
    Rubbery,
}

impl Choice for PrintTouch {
    const ALL: &'static [Self] = &[Self::Soft, Self::Rubbery];

    fn label(&self) -> &'static str {
        match self {
            Self::Soft => "Toque Zero/Macio",
            Self::Rubbery => "Emborrachado",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintSpecs {
    #[serde(serialize_with = "serialize_choice", deserialize_with = "lenient_choice")]
    pub technique: Option<PrintTechnique>,
    #[serde(serialize_with = "serialize_choice", deserialize_with = "lenient_choice")]
    pub touch: Option<PrintTouch>,
}

/// One print placement on the garment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintLocation {
    pub name: String,
    pub art: String,
    pub dimension: String,
    pub position: String,
    /// Pantone / colour references
    pub pantone: String,
    pub technique: String,
}

impl PrintLocation {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }
}

/// The three fixed print locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintLocations {
    pub local1: PrintLocation,
    pub local2: PrintLocation,
    pub local3: PrintLocation,
}

impl Default for PrintLocations {
    fn default() -> Self {
        Self {
            local1: PrintLocation::named("FRENTE (Tórax)"),
            local2: PrintLocation::named("COSTAS (Nuca)"),
            local3: PrintLocation::named("INTERNO"),
        }
    }
}

impl PrintLocations {
    pub fn iter(&self) -> impl Iterator<Item = &PrintLocation> {
        [&self.local1, &self.local2, &self.local3].into_iter()
    }

    /// Zero-based access
    pub fn get_mut(&mut self, index: usize) -> Option<&mut PrintLocation> {
        match index {
            0 => Some(&mut self.local1),
            1 => Some(&mut self.local2),
            2 => Some(&mut self.local3),
            _ => None,
        }
    }
}

/// Trim (aviamento) row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimEntry {
    pub used: bool,
    pub desc: String,
}

impl TrimEntry {
    fn used() -> Self {
        Self {
            used: true,
            desc: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Trims {
    pub linha_pesponto: TrimEntry,
    pub fio_overloque: TrimEntry,
    pub etiqueta_marca: TrimEntry,
    pub etiqueta_comp: TrimEntry,
    pub cadarco_limpeza: TrimEntry,
}

impl Default for Trims {
    fn default() -> Self {
        Self {
            linha_pesponto: TrimEntry::used(),
            fio_overloque: TrimEntry::used(),
            etiqueta_marca: TrimEntry::default(),
            etiqueta_comp: TrimEntry::used(),
            cadarco_limpeza: TrimEntry::used(),
        }
    }
}

impl Trims {
    /// Rows keyed like [`crate::model::catalog::TRIM_ITEMS`]
    pub fn get(&self, key: &str) -> Option<&TrimEntry> {
        match key {
            "linhaPesponto" => Some(&self.linha_pesponto),
            "fioOverloque" => Some(&self.fio_overloque),
            "etiquetaMarca" => Some(&self.etiqueta_marca),
            "etiquetaComp" => Some(&self.etiqueta_comp),
            "cadarcoLimpeza" => Some(&self.cadarco_limpeza),
            _ => None,
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut TrimEntry> {
        match key {
            "linhaPesponto" => Some(&mut self.linha_pesponto),
            "fioOverloque" => Some(&mut self.fio_overloque),
            "etiquetaMarca" => Some(&mut self.etiqueta_marca),
            "etiquetaComp" => Some(&mut self.etiqueta_comp),
            "cadarcoLimpeza" => Some(&mut self.cadarco_limpeza),
            _ => None,
        }
    }
}

/// Garment sizes on the production grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridSize {
    P,
    M,
    G,
    GG,
    XG,
}

impl GridSize {
    pub const ALL: [GridSize; 5] = [GridSize::P, GridSize::M, GridSize::G, GridSize::GG, GridSize::XG];

    pub fn label(&self) -> &'static str {
        match self {
            GridSize::P => "P",
            GridSize::M => "M",
            GridSize::G => "G",
            GridSize::GG => "GG",
            GridSize::XG => "XG",
        }
    }
}

impl FromStr for GridSize {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        GridSize::ALL
            .into_iter()
            .find(|size| size.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::Validation(format!("Tamanho desconhecido: {}", s)))
    }
}

/// Largest quantity the editors accept for one size of one colour
pub const MAX_GRID_QUANTITY: u32 = 100_000;

/// Pieces per size
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[allow(non_snake_case)]
pub struct SizeQuantities {
    pub P: u32,
    pub M: u32,
    pub G: u32,
    pub GG: u32,
    pub XG: u32,
}

impl SizeQuantities {
    pub fn get(&self, size: GridSize) -> u32 {
        match size {
            GridSize::P => self.P,
            GridSize::M => self.M,
            GridSize::G => self.G,
            GridSize::GG => self.GG,
            GridSize::XG => self.XG,
        }
    }

    pub fn set(&mut self, size: GridSize, quantity: u32) {
        match size {
            GridSize::P => self.P = quantity,
            GridSize::M => self.M = quantity,
            GridSize::G => self.G = quantity,
            GridSize::GG => self.GG = quantity,
            GridSize::XG => self.XG = quantity,
        }
    }

    /// Summed as `u64`; stored quantities are not bounded
    pub fn total(&self) -> u64 {
        GridSize::ALL.iter().map(|s| u64::from(self.get(*s))).sum()
    }
}

/// Colour variant → per-size quantities
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridRow {
    pub id: String,
    pub color: String,
    pub sizes: SizeQuantities,
}

impl Default for GridRow {
    fn default() -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            color: String::new(),
            sizes: SizeQuantities::default(),
        }
    }
}

impl GridRow {
    pub fn total(&self) -> u64 {
        self.sizes.total()
    }
}

/// Embedded image positions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSlot {
    /// Line art, sewing page
    TechnicalDrawing,
    /// Front mockup, print page
    Front,
    /// Back mockup, print page
    Back,
}

impl ImageSlot {
    pub const ALL: [ImageSlot; 3] = [ImageSlot::TechnicalDrawing, ImageSlot::Front, ImageSlot::Back];

    pub fn label(&self) -> &'static str {
        match self {
            ImageSlot::TechnicalDrawing => "Desenho Técnico",
            ImageSlot::Front => "Mockup Frente",
            ImageSlot::Back => "Mockup Costas",
        }
    }
}

impl FromStr for ImageSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "drawing" | "technical-drawing" | "desenho" => Ok(ImageSlot::TechnicalDrawing),
            "front" | "frente" => Ok(ImageSlot::Front),
            "back" | "costas" => Ok(ImageSlot::Back),
            other => Err(Error::Validation(format!(
                "Imagem desconhecida: {} (use drawing, front ou back)",
                other
            ))),
        }
    }
}

/// Garment production specification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TechPackDocument {
    // Identification
    pub reference: String,
    pub collection: String,
    pub product: String,
    pub responsible: String,
    /// "YYYY-MM-DD"
    pub date: String,

    // Media
    pub technical_drawing: Option<String>,
    pub image_front: Option<String>,
    pub image_back: Option<String>,

    pub production_grid: Vec<GridRow>,

    // Cutting
    pub fabric: String,
    pub fabric_width: String,
    pub fabric_yield: String,
    pub rest_time: bool,

    // Machinery
    pub machine_closing: String,
    pub machine_hem: String,
    pub machine_reinforcement: String,

    // Threads & hems
    pub needle_thread: String,
    pub looper_thread: String,
    pub hem_size: String,
    pub sleeve_hem: String,
    pub collar_material: String,
    pub collar_height: String,
    pub reinforcement_type: String,

    pub trims: Trims,
    pub obs_costura: String,

    pub print_specs: PrintSpecs,
    pub print_locations: PrintLocations,

    // DTF thermal settings
    pub dtf_temp: String,
    pub dtf_time: String,
    pub dtf_pressure: String,
    pub dtf_peel: String,

    pub variants: String,
}

impl TechPackDocument {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            reference: String::new(),
            collection: String::new(),
            product: String::new(),
            responsible: String::new(),
            date: today.format("%Y-%m-%d").to_string(),
            technical_drawing: None,
            image_front: None,
            image_back: None,
            production_grid: Vec::new(),
            fabric: String::new(),
            fabric_width: String::new(),
            fabric_yield: String::new(),
            rest_time: false,
            machine_closing: String::new(),
            machine_hem: String::new(),
            machine_reinforcement: String::new(),
            needle_thread: String::new(),
            looper_thread: String::new(),
            hem_size: String::new(),
            sleeve_hem: String::new(),
            collar_material: String::new(),
            collar_height: String::new(),
            reinforcement_type: String::new(),
            trims: Trims::default(),
            obs_costura: String::new(),
            print_specs: PrintSpecs::default(),
            print_locations: PrintLocations::default(),
            dtf_temp: String::new(),
            dtf_time: String::new(),
            dtf_pressure: String::new(),
            dtf_peel: String::new(),
            variants: String::new(),
        }
    }

    pub fn image(&self, slot: ImageSlot) -> Option<&str> {
        match slot {
            ImageSlot::TechnicalDrawing => self.technical_drawing.as_deref(),
            ImageSlot::Front => self.image_front.as_deref(),
            ImageSlot::Back => self.image_back.as_deref(),
        }
    }

    fn image_mut(&mut self, slot: ImageSlot) -> &mut Option<String> {
        match slot {
            ImageSlot::TechnicalDrawing => &mut self.technical_drawing,
            ImageSlot::Front => &mut self.image_front,
            ImageSlot::Back => &mut self.image_back,
        }
    }

    pub fn set_image(&mut self, slot: ImageSlot, data_uri: String) {
        *self.image_mut(slot) = Some(data_uri);
    }

    pub fn clear_image(&mut self, slot: ImageSlot) {
        *self.image_mut(slot) = None;
    }

    /// Append an empty grid row and return its id
    pub fn add_grid_row(&mut self, color: impl Into<String>) -> String {
        let row = GridRow {
            color: color.into(),
            ..GridRow::default()
        };
        let id = row.id.clone();
        self.production_grid.push(row);
        id
    }

    pub fn remove_grid_row(&mut self, id: &str) -> bool {
        match self.production_grid.iter().position(|row| row.id == id) {
            Some(index) => {
                self.production_grid.remove(index);
                true
            }
            None => false,
        }
    }

    pub fn set_grid_quantity(&mut self, id: &str, size: GridSize, quantity: u32) -> bool {
        match self.production_grid.iter_mut().find(|row| row.id == id) {
            Some(row) => {
                row.sizes.set(size, quantity);
                true
            }
            None => false,
        }
    }

    /// Column total for one size across all colour rows
    pub fn size_total(&self, size: GridSize) -> u64 {
        self.production_grid
            .iter()
            .map(|row| u64::from(row.sizes.get(size)))
            .sum()
    }

    pub fn grid_total(&self) -> u64 {
        self.production_grid.iter().map(|row| row.sizes.total()).sum()
    }

    pub fn validate_for_save(&self) -> Result<()> {
        if self.reference.trim().is_empty() {
            return Err(Error::Validation("Preencha a referência da ficha.".to_string()));
        }
        Ok(())
    }

    pub fn library_title(&self) -> String {
        let product = self.product.trim();
        if product.is_empty() {
            format!("Ficha {}", self.reference.trim())
        } else {
            format!("Ficha {} - {}", self.reference.trim(), product)
        }
    }
}

impl Default for TechPackDocument {
    fn default() -> Self {
        Self::new(Local::now().date_naive())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TechPackDocument {
        TechPackDocument::new(NaiveDate::from_ymd_opt(2025, 4, 2).unwrap())
    }

    #[test]
    fn test_defaults() {
        let doc = sample();
        assert_eq!(doc.date, "2025-04-02");
        assert_eq!(doc.print_locations.local1.name, "FRENTE (Tórax)");
        assert_eq!(doc.print_locations.local3.name, "INTERNO");
        assert!(doc.trims.linha_pesponto.used);
        assert!(!doc.trims.etiqueta_marca.used);
        assert!(doc.print_specs.technique.is_none());
    }

    #[test]
    fn test_grid_totals_do_not_overflow() {
        let mut doc = sample();
        let black = doc.add_grid_row("Preto");
        let white = doc.add_grid_row("Branco");
        doc.set_grid_quantity(&black, GridSize::P, u32::MAX);
        doc.set_grid_quantity(&black, GridSize::M, 1);
        doc.set_grid_quantity(&white, GridSize::P, u32::MAX);

        let max = u64::from(u32::MAX);
        assert_eq!(doc.production_grid[0].total(), max + 1);
        assert_eq!(doc.size_total(GridSize::P), 2 * max);
        assert_eq!(doc.grid_total(), 2 * max + 1);
    }

    #[test]
    fn test_grid_totals() {
        let mut doc = sample();
        let black = doc.add_grid_row("Preto");
        let white = doc.add_grid_row("Branco");
        doc.set_grid_quantity(&black, GridSize::M, 10);
        doc.set_grid_quantity(&black, GridSize::G, 5);
        doc.set_grid_quantity(&white, GridSize::M, 3);

        assert_eq!(doc.production_grid[0].total(), 15);
        assert_eq!(doc.size_total(GridSize::M), 13);
        assert_eq!(doc.grid_total(), 18);

        assert!(doc.remove_grid_row(&black));
        assert_eq!(doc.grid_total(), 3);
        assert!(!doc.set_grid_quantity(&black, GridSize::P, 1));
    }

    #[test]
    fn test_choice_wire_format() {
        let mut doc = sample();
        doc.print_specs.technique = Some(PrintTechnique::Dtf);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["printSpecs"]["technique"], "DTF - Direct to Film");
        assert_eq!(json["printSpecs"]["touch"], "");

        let back: TechPackDocument = serde_json::from_value(json).unwrap();
        assert_eq!(back.print_specs.technique, Some(PrintTechnique::Dtf));
    }

    #[test]
    fn test_unknown_choice_is_dropped() {
        let json = serde_json::json!({
            "reference": "R-10",
            "printSpecs": {"technique": "Bordado", "touch": "Emborrachado"}
        });
        let doc: TechPackDocument = serde_json::from_value(json).unwrap();
        assert_eq!(doc.reference, "R-10");
        assert_eq!(doc.print_specs.technique, None);
        assert_eq!(doc.print_specs.touch, Some(PrintTouch::Rubbery));
    }

    #[test]
    fn test_images() {
        let mut doc = sample();
        doc.set_image(ImageSlot::Front, "data:image/png;base64,AAAA".into());
        assert_eq!(doc.image(ImageSlot::Front), Some("data:image/png;base64,AAAA"));
        doc.clear_image(ImageSlot::Front);
        assert!(doc.image(ImageSlot::Front).is_none());
        assert_eq!("costas".parse::<ImageSlot>().unwrap(), ImageSlot::Back);
        assert!("lado".parse::<ImageSlot>().is_err());
    }

    #[test]
    fn test_validation_and_title() {
        let mut doc = sample();
        assert!(doc.validate_for_save().is_err());
        doc.reference = "SB-021".into();
        assert_eq!(doc.library_title(), "Ficha SB-021");
        doc.product = "Camiseta Oversized".into();
        assert_eq!(doc.library_title(), "Ficha SB-021 - Camiseta Oversized");
        assert!(doc.validate_for_save().is_ok());
    }
}
