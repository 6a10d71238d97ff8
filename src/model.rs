//! Entity records as delivered by the backend.
//!
//! The client never computes anything about entities; these types only carry
//! what the API returns so views can render names, colours and icons.

use serde::{Deserialize, Serialize};

/// Kinds of tracked entities.
///
/// The API is inconsistent about casing (`person` in note payloads, `PERSON`
/// in network payloads); both are accepted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
	/// A person.
	#[serde(alias = "PERSON")]
	Person,
	/// A project.
	#[serde(alias = "PROJECT")]
	Project,
	/// A habit.
	#[serde(alias = "HABIT")]
	Habit,
	/// A goal.
	#[serde(alias = "GOAL")]
	Goal,
	/// A dream.
	#[serde(alias = "DREAM")]
	Dream,
	/// An event.
	#[serde(alias = "EVENT")]
	Event,
	/// A user-defined kind.
	#[serde(alias = "CUSTOM")]
	Custom,
}

impl EntityKind {
	/// Every kind, in display order.
	pub const ALL: [EntityKind; 7] = [
		EntityKind::Person,
		EntityKind::Project,
		EntityKind::Habit,
		EntityKind::Goal,
		EntityKind::Dream,
		EntityKind::Event,
		EntityKind::Custom,
	];

	/// Lowercase tag used in mentions, e.g. `person`.
	pub fn as_str(self) -> &'static str {
		match self {
			EntityKind::Person => "person",
			EntityKind::Project => "project",
			EntityKind::Habit => "habit",
			EntityKind::Goal => "goal",
			EntityKind::Dream => "dream",
			EntityKind::Event => "event",
			EntityKind::Custom => "custom",
		}
	}

	/// Parse a tag, ignoring ASCII case.
	pub fn from_tag(tag: &str) -> Option<Self> {
		Self::ALL
			.into_iter()
			.find(|kind| kind.as_str().eq_ignore_ascii_case(tag))
	}

	/// Default colour for nodes and badges of this kind.
	pub fn color(self) -> &'static str {
		match self {
			EntityKind::Person => "#3b82f6",
			EntityKind::Habit => "#10b981",
			EntityKind::Project => "#f97316",
			EntityKind::Goal => "#8b5cf6",
			EntityKind::Dream => "#ec4899",
			EntityKind::Event => "#f59e0b",
			EntityKind::Custom => "#64748b",
		}
	}

	/// Prefix shown before an entity name in badges and suggestions.
	pub fn prefix(self) -> &'static str {
		match self {
			EntityKind::Person | EntityKind::Custom => "@",
			EntityKind::Habit => "*",
			EntityKind::Project => "#",
			EntityKind::Goal => "◎",
			EntityKind::Dream => "♡",
			EntityKind::Event => "◈",
		}
	}
}

/// An entity record.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Entity {
	/// Backend id, e.g. `ent_8f2a`.
	pub id: String,
	/// Entity kind.
	#[serde(rename = "type")]
	pub kind: EntityKind,
	/// Display name.
	pub name: String,
	/// Optional emoji or icon name.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub icon: Option<String>,
	/// Optional colour overriding the kind colour.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub color: Option<String>,
	/// Free-form description.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub description: Option<String>,
}

impl Entity {
	/// Colour to render this entity with.
	pub fn display_color(&self) -> &str {
		self.color.as_deref().unwrap_or(self.kind.color())
	}

	/// Name with the kind prefix or icon, as shown in badges.
	pub fn badge_label(&self) -> String {
		match &self.icon {
			Some(icon) => format!("{icon} {}", self.name),
			None => format!("{}{}", self.kind.prefix(), self.name),
		}
	}
}
