use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::DgField;

/// Backend message types understood by the master-data service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MessageType {
    #[serde(rename = "Product ID Init")]
    ProductInit,
    #[serde(rename = "UN Code Init")]
    UnCodeInit,
    #[serde(rename = "DG Class Init")]
    DgClassInit,
    #[serde(rename = "ProductID On Select")]
    ProductOnSelect,
    #[serde(rename = "UnCode On Select")]
    UnCodeOnSelect,
}

impl MessageType {
    /// List lookup that populates `field`'s dropdown.
    #[must_use]
    pub const fn init_for(field: DgField) -> Self {
        match field {
            DgField::Product => MessageType::ProductInit,
            DgField::UnCode => MessageType::UnCodeInit,
            DgField::DgClass => MessageType::DgClassInit,
        }
    }

    /// Detail lookup fired when `field` gets a value, if that field has one.
    #[must_use]
    pub const fn on_select_for(field: DgField) -> Option<Self> {
        match field {
            DgField::Product => Some(MessageType::ProductOnSelect),
            DgField::UnCode => Some(MessageType::UnCodeOnSelect),
            DgField::DgClass => None,
        }
    }

    /// Wire spelling.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MessageType::ProductInit => "Product ID Init",
            MessageType::UnCodeInit => "UN Code Init",
            MessageType::DgClassInit => "DG Class Init",
            MessageType::ProductOnSelect => "ProductID On Select",
            MessageType::UnCodeOnSelect => "UnCode On Select",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `{id, name}` pair identifying the selected record of an on-select lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchCriteria {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AdditionalFilter {
    pub filter_name: String,
    pub filter_value: String,
}

/// Request body of every lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LookupRequest {
    pub message_type: MessageType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_term: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_criteria: Option<SearchCriteria>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_filter: Vec<AdditionalFilter>,
}

impl LookupRequest {
    #[must_use]
    pub const fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            search_term: None,
            offset: None,
            limit: None,
            search_criteria: None,
            additional_filter: Vec::new(),
        }
    }

    /// Option list for `field`, optionally scoped by its driving field's code.
    #[must_use]
    pub fn options(field: DgField, driving_value: Option<&str>) -> Self {
        let mut request = Self::new(MessageType::init_for(field));
        if let (Some(value), Some(filter_name)) =
            (driving_value, field.driving_field().and_then(DgField::filter_name))
        {
            request.additional_filter.push(AdditionalFilter {
                filter_name: filter_name.to_string(),
                filter_value: value.to_string(),
            });
        }
        request
    }

    /// Detail lookup for a freshly selected Product or UN Code.
    #[must_use]
    pub fn on_select(field: DgField, code: &str, description: &str) -> Option<Self> {
        MessageType::on_select_for(field).map(|message_type| {
            let mut request = Self::new(message_type);
            request.search_criteria = Some(SearchCriteria {
                id: code.to_string(),
                name: description.to_string(),
            });
            request
        })
    }

    #[must_use]
    pub fn with_search_term(mut self, term: Option<&str>) -> Self {
        self.search_term = term.map(str::trim).filter(|t| !t.is_empty()).map(String::from);
        self
    }

    #[must_use]
    pub const fn with_page(mut self, offset: u32, limit: u32) -> Self {
        self.offset = Some(offset);
        self.limit = Some(limit);
        self
    }

    /// Value of the first additional filter, if any.
    #[must_use]
    pub fn filter_value(&self) -> Option<&str> {
        self.additional_filter.first().map(|filter| filter.filter_value.as_str())
    }
}
