//! Static reference data: service catalog, dropdown lists, letterhead

use serde::{Deserialize, Serialize};

/// Service name → SKU code
pub const SERVICE_CATALOG: &[(&str, &str)] = &[
    ("Desenvolvimento de Marca", "DESMAR"),
    ("Private Label", "PRILAB"),
    ("Personalização", "PER"),
    ("Consultoria", "CON"),
    ("Mentoria", "MEN"),
];

/// Service whose description is picked from [`PRIVATE_LABEL_MODELS`]
pub const PRIVATE_LABEL_SERVICE: &str = "Private Label";

pub const PRIVATE_LABEL_MODELS: &[&str] = &[
    "Camiseta Oversized",
    "Camiseta Streetwear",
    "Camiseta Casual",
    "Camiseta Slim",
    "Camiseta Feminina",
];

/// Look up the SKU for a service name. Unknown services have no code.
pub fn sku_for_service(service: &str) -> &'static str {
    SERVICE_CATALOG
        .iter()
        .find(|(name, _)| *name == service)
        .map(|(_, sku)| *sku)
        .unwrap_or("")
}

pub fn service_names() -> impl Iterator<Item = &'static str> {
    SERVICE_CATALOG.iter().map(|(name, _)| *name)
}

pub const CLOSING_MACHINES: &[&str] = &[
    "Overloque 4 Fios",
    "Overloque 3 Fios",
    "Interloque",
    "Reta Industrial",
];

pub const HEM_MACHINES: &[&str] = &["Galoneira", "Galoneira Fechadeira", "Reta Industrial"];

pub const REINFORCEMENT_MACHINES: &[&str] = &["Reta Industrial", "Galoneira", "Travete"];

pub const THREADS: &[&str] = &[
    "Poliéster 120",
    "Poliéster 80",
    "Algodão 100%",
    "Fio Texturizado",
];

pub const HEM_SIZES: &[&str] = &["1,5 cm", "2,0 cm", "2,5 cm", "3,0 cm"];

pub const COLLAR_MATERIALS: &[&str] = &["Ribana 1x1", "Ribana 2x1", "Mesmo Tecido", "Gola Polo"];

pub const REINFORCEMENT_TYPES: &[&str] = &[
    "Cadarço Ombro a Ombro",
    "Vivo Mesmo Tecido",
    "Fita de Sarja",
    "Sem Reforço",
];

/// Trims table rows: (field key, label)
pub const TRIM_ITEMS: &[(&str, &str)] = &[
    ("linhaPesponto", "Linha Pesponto"),
    ("fioOverloque", "Fio Overloque"),
    ("etiquetaMarca", "Etiqueta Marca"),
    ("etiquetaComp", "Etiqueta Comp."),
    ("cadarcoLimpeza", "Cadarço Limpeza"),
];

/// Letterhead printed on every quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanyInfo {
    pub name: String,
    pub cnpj: String,
    pub contact: String,
    pub address: String,
}

impl Default for CompanyInfo {
    fn default() -> Self {
        Self {
            name: "Sow Brand".to_string(),
            cnpj: "26.224.938/0001-89".to_string(),
            contact: "(47) 99197-6744 | https://www.sowbrandbrasil.com.br/".to_string(),
            address: "Rua Fermino Görl, 115, Reta, São Francisco do Sul - SC, 89333-558"
                .to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_services_have_codes() {
        assert_eq!(sku_for_service("Private Label"), "PRILAB");
        assert_eq!(sku_for_service("Mentoria"), "MEN");
        assert_eq!(service_names().count(), SERVICE_CATALOG.len());
    }

    #[test]
    fn test_unknown_service_has_empty_code() {
        assert_eq!(sku_for_service(""), "");
        assert_eq!(sku_for_service("mentoria"), "");
        assert_eq!(sku_for_service("Bordado"), "");
    }
}
