//! Cube queries attached to components.
//!
//! A [`CubeQuery`] references a single cube and lists the measures,
//! dimensions, filters and computed fields to load. Field names are given
//! *without* the cube prefix; the prefix is added on serialization.
//! Components refer to query columns through [`CubeQuery::field`], which
//! returns reference tokens such as `$sales.revenue`.
//!
//! A [`MultiCubeQuery`] spans several cubes and takes fully qualified
//! `cube.field` names instead.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::errors::{TrevlError, TrevlResult};

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;

/// A filter on a cube member.
///
/// Either `values` or `parameter` must be set. When both are set the
/// parameter is serialized and the values are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawFilter")]
pub struct Filter {
    member: String,
    operator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    values: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameter: Option<String>,
}

#[derive(Deserialize)]
struct RawFilter {
    member: String,
    operator: String,
    #[serde(default)]
    values: Option<Vec<String>>,
    #[serde(default)]
    parameter: Option<String>,
}

impl TryFrom<RawFilter> for Filter {
    type Error = TrevlError;

    fn try_from(raw: RawFilter) -> Result<Self, Self::Error> {
        Filter::new(raw.member, raw.operator, raw.values, raw.parameter)
    }
}

impl Filter {
    pub fn new(
        member: impl Into<String>,
        operator: impl Into<String>,
        values: Option<Vec<String>>,
        parameter: Option<String>,
    ) -> TrevlResult<Self> {
        let member = member.into();
        if values.is_none() && parameter.is_none() {
            return Err(TrevlError::InvalidFilter { member });
        }
        Ok(Self {
            member,
            operator: operator.into(),
            values,
            parameter,
        })
    }

    /// A filter comparing the member against fixed values.
    pub fn with_values<I, S>(member: impl Into<String>, operator: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            member: member.into(),
            operator: operator.into(),
            values: Some(values.into_iter().map(Into::into).collect()),
            parameter: None,
        }
    }

    /// A filter bound to a dashboard parameter.
    pub fn with_parameter(
        member: impl Into<String>,
        operator: impl Into<String>,
        parameter: impl Into<String>,
    ) -> Self {
        Self {
            member: member.into(),
            operator: operator.into(),
            values: None,
            parameter: Some(parameter.into()),
        }
    }

    pub fn member(&self) -> &str {
        &self.member
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    fn serialize_for(&self, qualify: impl Fn(&str) -> String) -> Value {
        let mut out = Map::new();
        out.insert("member".into(), json!(qualify(&self.member)));
        out.insert("operator".into(), json!(self.operator));
        if let Some(parameter) = &self.parameter {
            out.insert("parameter".into(), json!(parameter));
        } else if let Some(values) = self.values.as_ref().filter(|v| !v.is_empty()) {
            out.insert("values".into(), json!(values));
        }
        Value::Object(out)
    }
}

/// A computed field evaluated by the rendering service.
///
/// `arguments` maps the argument names used in `code` to cube fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Computed {
    pub name: String,
    pub code: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub arguments: BTreeMap<String, String>,
}

impl Computed {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            arguments: BTreeMap::new(),
        }
    }

    pub fn with_argument(mut self, name: impl Into<String>, field: impl Into<String>) -> Self {
        self.arguments.insert(name.into(), field.into());
        self
    }
}

/// A query against a single cube.
///
/// # Examples
///
/// ```rust
/// use serde_json::json;
/// use trevl_core::CubeQuery;
///
/// let query = CubeQuery::new("sales", ["revenue"], ["region"])?;
/// assert_eq!(query.field("region")?, "$sales.region");
/// assert_eq!(
///     query.serialize(),
///     json!({"measures": ["sales.revenue"], "dimensions": ["sales.region"]})
/// );
/// # Ok::<(), trevl_core::TrevlError>(())
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CubeQuery {
    cube: String,
    measures: Vec<String>,
    dimensions: Vec<String>,
    filters: Vec<Filter>,
    computed: Vec<Computed>,
}

impl CubeQuery {
    /// Creates a query. At least one measure or one dimension is required.
    pub fn new<M, D, S, T>(cube: impl Into<String>, measures: M, dimensions: D) -> TrevlResult<Self>
    where
        M: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let cube = cube.into();
        let measures: Vec<String> = measures.into_iter().map(Into::into).collect();
        let dimensions: Vec<String> = dimensions.into_iter().map(Into::into).collect();
        if measures.is_empty() && dimensions.is_empty() {
            return Err(TrevlError::MissingQueryFields {
                source_name: format!("cube '{}'", cube),
            });
        }
        Ok(Self {
            cube,
            measures,
            dimensions,
            filters: Vec::new(),
            computed: Vec::new(),
        })
    }

    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_computed(mut self, computed: Computed) -> Self {
        self.computed.push(computed);
        self
    }

    pub fn cube(&self) -> &str {
        &self.cube
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    pub fn computed(&self) -> &[Computed] {
        &self.computed
    }

    /// Returns the reference token for a measure, dimension or computed field.
    ///
    /// Measures and dimensions resolve to `$cube.field`, computed fields to
    /// `$name`.
    pub fn field(&self, name: &str) -> TrevlResult<String> {
        if self.measures.iter().chain(&self.dimensions).any(|f| f == name) {
            return Ok(format!("${}.{}", self.cube, name));
        }
        if self.computed.iter().any(|c| c.name == name) {
            return Ok(format!("${}", name));
        }

        let mut available: Vec<String> = self
            .measures
            .iter()
            .chain(&self.dimensions)
            .cloned()
            .chain(self.computed.iter().map(|c| c.name.clone()))
            .collect();
        available.sort();
        Err(TrevlError::UnknownField {
            field: name.to_string(),
            source_name: format!("cube '{}'", self.cube),
            available,
        })
    }

    fn qualify(&self, field: &str) -> String {
        format!("{}.{}", self.cube, field)
    }

    fn serialize_computed(&self, computed: &Computed) -> Value {
        let mut out = Map::new();
        out.insert("name".into(), json!(computed.name));
        out.insert("code".into(), json!(computed.code));
        if !computed.arguments.is_empty() {
            let arguments: Map<String, Value> = computed
                .arguments
                .iter()
                .map(|(dst, src)| (dst.clone(), json!(format!("${}.{}", self.cube, src))))
                .collect();
            out.insert("arguments".into(), Value::Object(arguments));
        }
        Value::Object(out)
    }

    /// Serializes the query in the form expected by the rendering service.
    pub fn serialize(&self) -> Value {
        let mut out = self.serialize_for_execution();
        if !self.computed.is_empty() {
            if let Value::Object(map) = &mut out {
                let computed: Vec<Value> = self
                    .computed
                    .iter()
                    .map(|c| self.serialize_computed(c))
                    .collect();
                map.insert("computed".into(), Value::Array(computed));
            }
        }
        out
    }

    /// Serializes the query without computed fields, which the query
    /// execution service does not understand.
    pub fn serialize_for_execution(&self) -> Value {
        let mut out = Map::new();
        if !self.measures.is_empty() {
            let measures: Vec<String> = self.measures.iter().map(|m| self.qualify(m)).collect();
            out.insert("measures".into(), json!(measures));
        }
        if !self.dimensions.is_empty() {
            let dimensions: Vec<String> = self.dimensions.iter().map(|d| self.qualify(d)).collect();
            out.insert("dimensions".into(), json!(dimensions));
        }
        if !self.filters.is_empty() {
            let filters: Vec<Value> = self
                .filters
                .iter()
                .map(|f| f.serialize_for(|m| self.qualify(m)))
                .collect();
            out.insert("filters".into(), Value::Array(filters));
        }
        Value::Object(out)
    }
}

/// A query spanning several cubes.
///
/// Measures and dimensions are given fully qualified (`cube.field`).
#[derive(Debug, Clone, PartialEq)]
pub struct MultiCubeQuery {
    measures: Vec<String>,
    dimensions: Vec<String>,
    filters: Vec<Filter>,
}

impl MultiCubeQuery {
    pub fn new<M, D, S, T>(measures: M, dimensions: D) -> TrevlResult<Self>
    where
        M: IntoIterator<Item = S>,
        D: IntoIterator<Item = T>,
        S: Into<String>,
        T: Into<String>,
    {
        let measures: Vec<String> = measures.into_iter().map(Into::into).collect();
        let dimensions: Vec<String> = dimensions.into_iter().map(Into::into).collect();
        if measures.is_empty() && dimensions.is_empty() {
            return Err(TrevlError::MissingQueryFields {
                source_name: "multi-cube query".to_string(),
            });
        }
        Ok(Self {
            measures,
            dimensions,
            filters: Vec::new(),
        })
    }

    /// Adds a filter; its member must be fully qualified.
    pub fn with_filter(mut self, filter: Filter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn measures(&self) -> &[String] {
        &self.measures
    }

    pub fn dimensions(&self) -> &[String] {
        &self.dimensions
    }

    pub fn field(&self, name: &str) -> TrevlResult<String> {
        if self.measures.iter().chain(&self.dimensions).any(|f| f == name) {
            return Ok(format!("${}", name));
        }
        let mut available: Vec<String> =
            self.measures.iter().chain(&self.dimensions).cloned().collect();
        available.sort();
        Err(TrevlError::UnknownField {
            field: name.to_string(),
            source_name: "multi-cube query".to_string(),
            available,
        })
    }

    pub fn serialize(&self) -> Value {
        let mut out = Map::new();
        if !self.measures.is_empty() {
            out.insert("measures".into(), json!(self.measures));
        }
        if !self.dimensions.is_empty() {
            out.insert("dimensions".into(), json!(self.dimensions));
        }
        if !self.filters.is_empty() {
            let filters: Vec<Value> = self
                .filters
                .iter()
                .map(|f| f.serialize_for(|m| m.to_string()))
                .collect();
            out.insert("filters".into(), Value::Array(filters));
        }
        Value::Object(out)
    }
}

/// Any query a component can be attached to.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Cube(CubeQuery),
    MultiCube(MultiCubeQuery),
}

impl Query {
    pub fn field(&self, name: &str) -> TrevlResult<String> {
        match self {
            Query::Cube(q) => q.field(name),
            Query::MultiCube(q) => q.field(name),
        }
    }

    pub fn measures(&self) -> &[String] {
        match self {
            Query::Cube(q) => q.measures(),
            Query::MultiCube(q) => q.measures(),
        }
    }

    pub fn dimensions(&self) -> &[String] {
        match self {
            Query::Cube(q) => q.dimensions(),
            Query::MultiCube(q) => q.dimensions(),
        }
    }

    pub fn serialize(&self) -> Value {
        match self {
            Query::Cube(q) => q.serialize(),
            Query::MultiCube(q) => q.serialize(),
        }
    }

    pub fn serialize_for_execution(&self) -> Value {
        match self {
            Query::Cube(q) => q.serialize_for_execution(),
            Query::MultiCube(q) => q.serialize(),
        }
    }
}

impl From<CubeQuery> for Query {
    fn from(query: CubeQuery) -> Self {
        Query::Cube(query)
    }
}

impl From<MultiCubeQuery> for Query {
    fn from(query: MultiCubeQuery) -> Self {
        Query::MultiCube(query)
    }
}

/// Serializable description of a query, as found in dashboard definition
/// files. Without a `cube` the fields are taken as fully qualified and a
/// [`MultiCubeQuery`] is built.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueryDefinition {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cube: Option<String>,
    #[serde(default)]
    pub measures: Vec<String>,
    #[serde(default)]
    pub dimensions: Vec<String>,
    #[serde(default)]
    pub filters: Vec<Filter>,
    #[serde(default)]
    pub computed: Vec<Computed>,
}

impl TryFrom<QueryDefinition> for Query {
    type Error = TrevlError;

    fn try_from(def: QueryDefinition) -> Result<Self, Self::Error> {
        match def.cube {
            Some(cube) => {
                let query = CubeQuery::new(cube, def.measures, def.dimensions)?;
                let query = def.filters.into_iter().fold(query, CubeQuery::with_filter);
                let query = def.computed.into_iter().fold(query, CubeQuery::with_computed);
                Ok(Query::Cube(query))
            }
            None => {
                let query = MultiCubeQuery::new(def.measures, def.dimensions)?;
                let query = def.filters.into_iter().fold(query, MultiCubeQuery::with_filter);
                Ok(Query::MultiCube(query))
            }
        }
    }
}
