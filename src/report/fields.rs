//! Template field identifiers.
//!
//! The document templates address every value by a fixed identifier such
//! as `QAG_07` or `QSD_31`. These identifiers are a contract with the
//! templates, so they live here as constants instead of literals spread
//! through the assembler. Bump [`FIELD_VOCABULARY_VERSION`] whenever an
//! identifier is added, removed or changes meaning.

use super::layout::layout_for;
use super::ReportType;
use serde::{Serialize, Serializer};
use std::fmt;

pub const FIELD_VOCABULARY_VERSION: &str = "2024.3";

/// Identifier of one template field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldId(&'static str);

impl FieldId {
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for FieldId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.0)
    }
}

macro_rules! field_ids {
    ($($name:ident $(= $value:literal)?),* $(,)?) => {
        $(field_ids!(@one $name $(= $value)?);)*
    };
    (@one $name:ident) => {
        pub const $name: FieldId = FieldId(stringify!($name));
    };
    (@one $name:ident = $value:literal) => {
        pub const $name: FieldId = FieldId($value);
    };
}

/// Surface water template.
pub mod qag {
    use super::FieldId;

    field_ids!(
        PARAMETROS_ESCOLHIDOS = "parametros_escolhidos",
        QAG_01, QAG_02, QAG_03, QAG_04, QAG_05, QAG_06, QAG_07, QAG_08,
        QAG_09, QAG_10, QAG_11, QAG_12, QAG_13, QAG_14, QAG_15, QAG_16,
        QAG_18, QAG_19,
        QAG_20_1, QAG_20_2, QAG_20_3, QAG_20_4, QAG_20_5, QAG_20_6, QAG_20_7,
        QAG_22, QAG_23, QAG_24, QAG_25, QAG_26, QAG_27, QAG_28, QAG_29,
        QAG_30, QAG_31, QAG_32, QAG_33, QAG_34, QAG_35,
        QAG_40, QAG_43, QAG_54,
    );
}

/// Groundwater template. Part of its identifiers still carry the surface
/// water prefix and two are lowercase; the template expects them as is.
pub mod qags {
    use super::FieldId;

    field_ids!(
        PARAMETROS_ESCOLHIDOS = "parametros_escolhidos",
        QAGS_01, QAGS_02, QAGS_03, QAGS_04, QAGS_05, QAGS_06, QAGS_07, QAGS_08,
        QAGS_09, QAGS_10, QAGS_11, QAGS_12, QAGS_13, QAGS_14, QAGS_15, QAGS_16,
        QAGS_18, QAGS_19,
        QAGS_20_1, QAGS_20_2, QAGS_20_3, QAGS_20_4, QAGS_20_5, QAGS_20_6, QAGS_20_7,
        QAGS_22, QAGS_23, QAGS_24, QAGS_25, QAGS_26,
        TABELA_QAGS_27 = "tabela_qags_27",
        QAGS_28, QAGS_29, QAGS_31, QAGS_32, QAGS_33, QAGS_34, QAGS_35,
        QAG_37, QAG_38, QAG_40, QAG_43, QAG_54,
    );
}

/// Sediment template.
pub mod qsd {
    use super::FieldId;

    field_ids!(
        QSD_01, QSD_02, QSD_03, QSD_04, QSD_05, QSD_06, QSD_07, QSD_08,
        QSD_09, QSD_10, QSD_11, QSD_12, QSD_13, QSD_14, QSD_15, QSD_16,
        QSD_18, QSD_19,
        QSD_20_1, QSD_20_2, QSD_20_3, QSD_20_4, QSD_20_5, QSD_20_6, QSD_20_7,
        QSD_21, QSD_22, QSD_23, QSD_24, QSD_25, QSD_26, QSD_28, QSD_29,
        QSD_30, QSD_31, QSD_32, QSD_33, QSD_34, QSD_35, QSD_36,
        QSD_37, QSD_38, QSD_39, QSD_40, QSD_41, QSD_42, QSD_43,
        QSD_44, QSD_45, QSD_46, QSD_47, QSD_48, QSD_49, QSD_50, QSD_51, QSD_54,
    );
}

/// Every field of a report's template, in layout order.
pub fn vocabulary(report: ReportType) -> Vec<FieldId> {
    layout_for(report).iter().map(|entry| entry.field).collect()
}

pub fn lookup(report: ReportType, name: &str) -> Option<FieldId> {
    layout_for(report)
        .iter()
        .map(|entry| entry.field)
        .find(|field| field.as_str() == name)
}
