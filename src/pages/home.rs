use leptos::prelude::*;
use log::{info, warn};

use crate::components::entity_network::{EntityNetwork, GraphData};
use crate::components::{MentionDisplay, MentionInput};
use crate::context::{EntityDirectory, use_app_context};
use crate::mentions::mention_count;
use crate::model::Entity;

// Stand-ins for `/api/entities` and `/api/metrics/network` responses.
const SAMPLE_ENTITIES: &str = r#"[
	{"id": "ent_8f2a", "type": "person", "name": "Emilly", "icon": "👩"},
	{"id": "ent_a1c3", "type": "person", "name": "João"},
	{"id": "ent_91ab", "type": "project", "name": "Continuum"},
	{"id": "ent_h1", "type": "habit", "name": "Meditação"},
	{"id": "ent_h2", "type": "habit", "name": "Corrida"},
	{"id": "ent_g1", "type": "goal", "name": "Maratona"}
]"#;

const SAMPLE_NETWORK: &str = r#"{
	"nodes": [
		{"id": "ent_8f2a", "name": "Emilly", "type": "PERSON"},
		{"id": "ent_a1c3", "name": "João", "type": "PERSON"},
		{"id": "ent_91ab", "name": "Continuum", "type": "PROJECT"},
		{"id": "ent_h1", "name": "Meditação", "type": "HABIT"},
		{"id": "ent_h2", "name": "Corrida", "type": "HABIT"},
		{"id": "ent_g1", "name": "Maratona", "type": "GOAL"}
	],
	"connections": [
		{"source": "ent_8f2a", "target": "ent_a1c3", "strength": 0.8},
		{"source": "ent_8f2a", "target": "ent_91ab", "strength": 0.3},
		{"source": "ent_h2", "target": "ent_g1", "strength": 1.0},
		{"source": "ent_a1c3", "target": "ent_h2", "strength": 0.15},
		{"source": "ent_h1", "target": "ent_8f2a", "strength": 0.5}
	]
}"#;

const SAMPLE_NOTE: &str =
	"Saí com {person:ent_8f2a} e foi legal.\nDepois {habit:ent_h2} pensando na {goal:ent_g1}; {person:ent_gone} não veio.";

/// Journal page: write a note with mentions, see it rendered, explore the network.
#[component]
pub fn Home() -> impl IntoView {
	let ctx = use_app_context();
	match EntityDirectory::from_json(SAMPLE_ENTITIES) {
		Ok(dir) => ctx.hydrate(dir),
		Err(err) => warn!("could not load entities: {err}"),
	}

	let network = GraphData::from_json(SAMPLE_NETWORK).unwrap_or_else(|err| {
		warn!("could not load network: {err}");
		GraphData::default()
	});
	let graph_data = Signal::derive(move || network.clone());

	let content = RwSignal::new(SAMPLE_NOTE.to_string());
	let mentions = Memo::new(move |_| content.with(|text| mention_count(text)));
	let selected = RwSignal::new(None::<String>);

	view! {
		<main class="journal">
			<section class="journal-editor">
				<h2>"Diário"</h2>
				<MentionInput content=content />
				<p class="mention-count">{move || format!("{} menções", mentions.get())}</p>
			</section>
			<section class="journal-preview">
				<MentionDisplay
					content=content
					on_entity_click=Callback::new(move |entity: Entity| {
						selected.set(Some(entity.id))
					})
				/>
			</section>
			<section class="journal-network">
				<h2>"Rede de Entidades"</h2>
				<EntityNetwork
					data=graph_data
					on_select=Callback::new(move |id: String| {
						info!("selected entity {id}");
						selected.set(Some(id));
					})
				/>
				<p class="selected-entity">
					{move || selected.get().map(|id| format!("Selecionada: {id}"))}
				</p>
			</section>
		</main>
	}
}
