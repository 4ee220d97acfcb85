use crate::error::ModelError;
use crate::field::Field;
use crate::models::run::Run;
use crate::models::tool::Tool;
use crate::wire::{WireModel, WireReader, WireWriter, WireValue, wire_model_serde};
use serde_json::{Map, Value};

/// One page of a paginated listing.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub data: Field<Vec<T>>,
    pub page: Field<i64>,
    pub limit: Field<i64>,
    pub total: Field<i64>,
    pub has_more: Field<bool>,
    pub additional_properties: Map<String, Value>,
}

pub type RunList = Page<Run>;
pub type ToolList = Page<Tool>;

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            data: Field::Unset,
            page: Field::Unset,
            limit: Field::Unset,
            total: Field::Unset,
            has_more: Field::Unset,
            additional_properties: Map::new(),
        }
    }
}

impl<T> Page<T> {
    /// Items on this page; empty when the server sent none.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.data.as_option().map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn has_more(&self) -> bool {
        self.has_more.as_option().copied().unwrap_or(false)
    }
}

impl<T: WireValue> Page<T> {
    fn encode(&self) -> Map<String, Value> {
        WireWriter::new(&self.additional_properties)
            .optional("data", &self.data)
            .optional("page", &self.page)
            .optional("limit", &self.limit)
            .optional("total", &self.total)
            .optional("hasMore", &self.has_more)
            .finish()
    }

    fn decode(object: Map<String, Value>) -> Result<Self, ModelError> {
        let mut r = WireReader::new(object);
        Ok(Self {
            data: r.optional("data")?,
            page: r.optional("page")?,
            limit: r.optional("limit")?,
            total: r.optional("total")?,
            has_more: r.optional("hasMore")?,
            additional_properties: r.finish(),
        })
    }
}

impl WireModel for RunList {
    const NAME: &'static str = "ListRunsResponse";

    fn to_wire(&self) -> Map<String, Value> {
        self.encode()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        Self::decode(object)
    }
}

impl WireModel for ToolList {
    const NAME: &'static str = "ListToolsResponse";

    fn to_wire(&self) -> Map<String, Value> {
        self.encode()
    }

    fn from_wire(object: Map<String, Value>) -> Result<Self, ModelError> {
        Self::decode(object)
    }
}

wire_model_serde!(RunList, ToolList);
