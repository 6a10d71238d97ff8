//! Application context: state shared between views.
//!
//! There are no global stores. [`AppContext`] is created once by the root
//! component, handed down through Leptos context, hydrated with what the
//! backend returns and cleared explicitly on teardown.

use leptos::prelude::*;
use log::{debug, info};

use crate::error::Result;
use crate::mentions::{AutocompleteState, Mention, MentionSyntax};
use crate::model::{Entity, EntityKind};

/// Suggestions shown in the mention popup.
pub const SUGGESTION_LIMIT: usize = 8;

/// Entities known to the client, as resolved by the backend.
///
/// Serves two purposes: turning mentions into displayable records, and
/// filtering autocomplete candidates locally.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EntityDirectory {
	entities: Vec<Entity>,
}

impl EntityDirectory {
	/// Directory over `entities`, keeping their order.
	pub fn new(entities: Vec<Entity>) -> Self {
		let mut dir = Self::default();
		dir.extend(entities);
		dir
	}

	/// Decode a JSON array of entity records.
	pub fn from_json(json: &str) -> Result<Self> {
		let entities: Vec<Entity> = serde_json::from_str(json)?;
		Ok(Self::new(entities))
	}

	/// Add or replace entities, matching on id.
	pub fn extend(&mut self, entities: impl IntoIterator<Item = Entity>) {
		for entity in entities {
			match self.entities.iter_mut().find(|e| e.id == entity.id) {
				Some(existing) => *existing = entity,
				None => self.entities.push(entity),
			}
		}
	}

	/// Number of known entities.
	pub fn len(&self) -> usize {
		self.entities.len()
	}

	/// True when nothing has been loaded.
	pub fn is_empty(&self) -> bool {
		self.entities.is_empty()
	}

	/// Look up an entity by id.
	pub fn get(&self, id: &str) -> Option<&Entity> {
		self.entities.iter().find(|e| e.id == id)
	}

	/// The record a mention points at, if the client knows it.
	///
	/// `{type:id}` must match both kind and id. The legacy `{{entity:id}}` form
	/// has no type and matches on id alone.
	pub fn resolve(&self, mention: &Mention<'_>) -> Option<&Entity> {
		let entity = self.get(mention.entity_id)?;
		match mention.syntax {
			MentionSyntax::DoubleBrace => Some(entity),
			MentionSyntax::Braced => {
				(EntityKind::from_tag(mention.entity_type) == Some(entity.kind)).then_some(entity)
			}
		}
	}

	/// Candidates for an autocomplete popup.
	///
	/// Keeps entities of the implied kind (any kind for a bare `{`) whose name
	/// contains the search term, ignoring case; an empty term matches all.
	pub fn suggest(&self, state: &AutocompleteState, limit: usize) -> Vec<&Entity> {
		let kind = state.kind_filter();
		let term = state.search_term().trim().to_lowercase();
		self.entities
			.iter()
			.filter(|e| kind.is_none_or(|k| e.kind == k))
			.filter(|e| e.name.to_lowercase().contains(&term))
			.take(limit)
			.collect()
	}

	/// Forget every entity.
	pub fn clear(&mut self) {
		self.entities.clear();
	}
}

impl IntoIterator for EntityDirectory {
	type Item = Entity;
	type IntoIter = std::vec::IntoIter<Entity>;

	fn into_iter(self) -> Self::IntoIter {
		self.entities.into_iter()
	}
}

/// Handles to the client's shared state.
#[derive(Clone, Copy, Debug)]
pub struct AppContext {
	/// Entities resolved by the backend.
	pub entities: RwSignal<EntityDirectory>,
}

impl AppContext {
	/// Empty context.
	pub fn new() -> Self {
		Self {
			entities: RwSignal::new(EntityDirectory::default()),
		}
	}

	/// Load entities fetched from the backend.
	pub fn hydrate(&self, entities: impl IntoIterator<Item = Entity>) {
		self.entities.update(|dir| dir.extend(entities));
		debug!(
			"hydrated entities; {} known",
			self.entities.with_untracked(EntityDirectory::len)
		);
	}

	/// Drop all derived state, e.g. on logout.
	pub fn teardown(&self) {
		// May run during owner disposal, after the signal is gone.
		self.entities.try_update(EntityDirectory::clear);
		info!("application context cleared");
	}
}

impl Default for AppContext {
	fn default() -> Self {
		Self::new()
	}
}

/// Make `ctx` available to every descendant component.
pub fn provide_app_context(ctx: AppContext) {
	provide_context(ctx);
}

/// The context provided by the root component.
///
/// Panics when called outside of [`App`](crate::App).
pub fn use_app_context() -> AppContext {
	expect_context::<AppContext>()
}
