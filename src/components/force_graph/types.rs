//! Graph data structures supplied by the host.
//!
//! Field names follow the CMS document schema (`_id`, `entityType`,
//! `importance`, ...) with plain-named aliases, so payloads can be passed
//! through from the content API without reshaping.

use serde::Deserialize;

/// Default importance for entities that do not specify one.
pub const DEFAULT_WEIGHT: f64 = 50.0;

/// Default strength for relationships that do not specify one.
pub const DEFAULT_STRENGTH: f64 = 50.0;

/// Kind of thing an entity represents. Drives node color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
#[allow(missing_docs)]
pub enum Category {
	Person,
	Organization,
	Product,
	Place,
	Topic,
	/// Also the fallback for category names we do not know. Must stay the
	/// last variant for `#[serde(other)]`.
	#[default]
	#[serde(other)]
	Concept,
}

impl Category {
	/// Every category, in legend order.
	pub const ALL: [Category; 6] = [
		Category::Person,
		Category::Organization,
		Category::Product,
		Category::Place,
		Category::Concept,
		Category::Topic,
	];

	/// Human-readable label shown in tooltips.
	pub fn label(self) -> &'static str {
		match self {
			Category::Person => "Person",
			Category::Organization => "Organization",
			Category::Product => "Product",
			Category::Place => "Place",
			Category::Concept => "Concept",
			Category::Topic => "Topic",
		}
	}
}

/// A slug as stored by the CMS: either a bare string or `{ "current": "..." }`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum SlugField {
	Plain(String),
	Object { current: String },
}

impl From<SlugField> for String {
	fn from(slug: SlugField) -> Self {
		match slug {
			SlugField::Plain(s) | SlugField::Object { current: s } => s,
		}
	}
}

/// Treats an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: serde::Deserializer<'de>,
	T: Deserialize<'de> + Default,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_slug<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(Option::<SlugField>::deserialize(deserializer)?.map(String::from))
}

/// A reference to another document: an id string, or an expanded/unexpanded
/// reference object carrying `_id` or `_ref`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
enum ReferenceField {
	Plain(String),
	Object {
		#[serde(rename = "_id", alias = "id", alias = "_ref")]
		id: String,
	},
}

/// A dangling reference projects to `null`; it becomes an empty id, which
/// never resolves to a node.
fn deserialize_reference<'de, D>(deserializer: D) -> Result<String, D::Error>
where
	D: serde::Deserializer<'de>,
{
	Ok(match Option::<ReferenceField>::deserialize(deserializer)? {
		Some(ReferenceField::Plain(id)) | Some(ReferenceField::Object { id }) => id,
		None => String::new(),
	})
}

/// One knowledge-graph entity. Becomes one node.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Entity {
	/// Unique document id.
	#[serde(rename = "_id", alias = "id", default, deserialize_with = "null_as_default")]
	pub id: String,
	/// Display label.
	#[serde(default, deserialize_with = "null_as_default")]
	pub name: String,
	/// Drives node color. Unknown or missing values become [`Category::Concept`].
	#[serde(
		rename = "entityType",
		alias = "category",
		default,
		deserialize_with = "null_as_default"
	)]
	pub category: Category,
	/// Importance in [0, 100]. Unset means [`DEFAULT_WEIGHT`].
	#[serde(rename = "importance", alias = "weight", default)]
	pub weight: Option<f64>,
	/// Slug used for navigation when the node is clicked.
	#[serde(
		rename = "slug",
		alias = "externalRef",
		default,
		deserialize_with = "deserialize_slug"
	)]
	pub external_ref: Option<String>,
}

impl Entity {
	/// Entity with default weight and no slug.
	pub fn new(id: impl Into<String>, name: impl Into<String>, category: Category) -> Self {
		Self {
			id: id.into(),
			name: name.into(),
			category,
			weight: None,
			external_ref: None,
		}
	}

	/// Sets the importance.
	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = Some(weight);
		self
	}

	/// Sets the slug.
	pub fn with_external_ref(mut self, external_ref: impl Into<String>) -> Self {
		self.external_ref = Some(external_ref.into());
		self
	}
}

/// A directed, typed relationship between two entities. Becomes one edge.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Relationship {
	/// Id of the source entity. Empty when the reference is missing or null.
	#[serde(
		rename = "source",
		alias = "sourceId",
		default,
		deserialize_with = "deserialize_reference"
	)]
	pub source_id: String,
	/// Id of the target entity. Empty when the reference is missing or null.
	#[serde(
		rename = "target",
		alias = "targetId",
		default,
		deserialize_with = "deserialize_reference"
	)]
	pub target_id: String,
	/// Relationship label, display only.
	#[serde(
		rename = "relationshipType",
		alias = "kind",
		default,
		deserialize_with = "null_as_default"
	)]
	pub kind: String,
	/// Strength in [0, 100]. Unset means [`DEFAULT_STRENGTH`].
	#[serde(default)]
	pub strength: Option<f64>,
}

impl Relationship {
	/// Relationship with default strength.
	pub fn new(
		source_id: impl Into<String>,
		target_id: impl Into<String>,
		kind: impl Into<String>,
	) -> Self {
		Self {
			source_id: source_id.into(),
			target_id: target_id.into(),
			kind: kind.into(),
			strength: None,
		}
	}

	/// Sets the strength.
	pub fn with_strength(mut self, strength: f64) -> Self {
		self.strength = Some(strength);
		self
	}
}

/// Complete graph payload: entities, relationships, and an optional entity
/// to highlight.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphData {
	/// Graph nodes.
	#[serde(default, deserialize_with = "null_as_default")]
	pub entities: Vec<Entity>,
	/// Graph edges.
	#[serde(default, deserialize_with = "null_as_default")]
	pub relationships: Vec<Relationship>,
	/// Id of the entity to highlight.
	#[serde(default)]
	pub focus_entity: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn parses_cms_field_names() {
		let json = r#"{
			"entities": [
				{ "_id": "drafts.e1", "name": "Ada", "entityType": "person",
				  "importance": 80, "slug": { "current": "ada" } },
				{ "_id": "e2", "name": "Engine", "entityType": "product" }
			],
			"relationships": [
				{ "source": { "_id": "e1", "name": "Ada" }, "target": { "_ref": "e2" },
				  "relationshipType": "created", "strength": 70 }
			],
			"focusEntity": "e1"
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.entities.len(), 2);
		let ada = &data.entities[0];
		assert_eq!(ada.id, "drafts.e1");
		assert_eq!(ada.category, Category::Person);
		assert_eq!(ada.weight, Some(80.0));
		assert_eq!(ada.external_ref.as_deref(), Some("ada"));
		assert_eq!(data.entities[1].weight, None);
		assert_eq!(data.entities[1].external_ref, None);

		let rel = &data.relationships[0];
		assert_eq!(rel.source_id, "e1");
		assert_eq!(rel.target_id, "e2");
		assert_eq!(rel.kind, "created");
		assert_eq!(rel.strength, Some(70.0));
		assert_eq!(data.focus_entity.as_deref(), Some("e1"));
	}

	#[test]
	fn parses_plain_field_names() {
		let json = r#"{
			"entities": [
				{ "id": "a", "name": "A", "category": "topic", "weight": 10, "externalRef": "a-slug" }
			],
			"relationships": [
				{ "sourceId": "a", "targetId": "a", "kind": "relatedTo" }
			]
		}"#;
		let data: GraphData = serde_json::from_str(json).unwrap();

		assert_eq!(data.entities[0].category, Category::Topic);
		assert_eq!(data.entities[0].external_ref.as_deref(), Some("a-slug"));
		assert_eq!(data.relationships[0].source_id, "a");
		assert_eq!(data.relationships[0].strength, None);
	}

	#[test]
	fn unknown_category_falls_back_to_concept() {
		let entity: Entity =
			serde_json::from_str(r#"{ "_id": "x", "name": "X", "entityType": "event" }"#).unwrap();
		assert_eq!(entity.category, Category::Concept);

		let entity: Entity = serde_json::from_str(r#"{ "_id": "y", "name": "Y" }"#).unwrap();
		assert_eq!(entity.category, Category::Concept);
	}

	#[test]
	fn null_fields_take_defaults() {
		let entity: Entity =
			serde_json::from_str(r#"{ "_id": "a", "name": null, "entityType": null, "slug": null }"#)
				.unwrap();
		assert_eq!(entity.name, "");
		assert_eq!(entity.category, Category::Concept);
		assert_eq!(entity.external_ref, None);

		let rel: Relationship = serde_json::from_str(
			r#"{ "source": null, "target": { "_ref": "a" }, "relationshipType": null }"#,
		)
		.unwrap();
		assert_eq!(rel.source_id, "");
		assert_eq!(rel.target_id, "a");
		assert_eq!(rel.kind, "");

		let rel: Relationship = serde_json::from_str(r#"{ "target": "a" }"#).unwrap();
		assert_eq!(rel.source_id, "");

		let data: GraphData =
			serde_json::from_str(r#"{ "entities": null, "relationships": null }"#).unwrap();
		assert_eq!(data, GraphData::default());
	}

	#[test]
	fn empty_payload_is_an_empty_graph() {
		let data: GraphData = serde_json::from_str("{}").unwrap();
		assert_eq!(data, GraphData::default());
	}
}
