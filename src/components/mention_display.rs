use leptos::prelude::*;

use crate::context::{EntityDirectory, use_app_context};
use crate::mentions::{Token, tokenize};
use crate::model::Entity;

/// Renders note content with mentions shown as entity badges.
///
/// Mentions the directory cannot resolve stay visible as their raw text,
/// faded, so nothing the backend returns is ever dropped from view.
#[component]
pub fn MentionDisplay(
	/// Note text to render.
	#[prop(into)]
	content: Signal<String>,
	/// Called when a resolved badge is clicked.
	#[prop(optional)]
	on_entity_click: Option<Callback<Entity>>,
) -> impl IntoView {
	let ctx = use_app_context();

	view! {
		<div class="mention-display">
			{move || {
				content.with(|text| {
					ctx.entities.with(|dir| {
						tokenize(text)
							.map(|token| render_token(token, dir, on_entity_click))
							.collect_view()
					})
				})
			}}
		</div>
	}
}

fn render_token(
	token: Token<'_>,
	dir: &EntityDirectory,
	on_click: Option<Callback<Entity>>,
) -> AnyView {
	let mention = match token {
		Token::Text(text) => {
			return view! { <span class="mention-text">{text.to_owned()}</span> }.into_any();
		}
		Token::Mention(mention) => mention,
	};

	let Some(entity) = dir.resolve(&mention).cloned() else {
		return view! {
			<span class="mention-unresolved" title="Unknown entity">{mention.raw.to_owned()}</span>
		}
		.into_any();
	};

	let style = format!("color: {};", entity.display_color());
	let label = entity.badge_label();
	let id = entity.id.clone();
	view! {
		<span
			class="mention-badge"
			data-entity-id=id
			style=style
			on:click=move |_| {
				if let Some(cb) = on_click {
					cb.run(entity.clone());
				}
			}
		>
			{label}
		</span>
	}
	.into_any()
}
