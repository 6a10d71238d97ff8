use leptos::prelude::*;
use log::debug;
use wasm_bindgen::JsCast;
use web_sys::{HtmlTextAreaElement, KeyboardEvent, MouseEvent};

use crate::context::{SUGGESTION_LIMIT, use_app_context};
use crate::mentions::autocomplete::{char_to_utf16_offset, utf16_to_char_offset};
use crate::mentions::{AutocompleteState, complete_mention, detect_autocomplete_context};
use crate::model::Entity;

/// Step the highlighted suggestion forward or back, wrapping around.
fn cycle(selected: usize, count: usize, forward: bool) -> usize {
	if count == 0 {
		return 0;
	}
	if forward {
		(selected + 1) % count
	} else {
		(selected + count - 1) % count
	}
}

/// Char offset of the caret in `el`, falling back to the end of `text`.
fn caret_of(el: &HtmlTextAreaElement, text: &str) -> usize {
	match el.selection_start() {
		Ok(Some(utf16)) => utf16_to_char_offset(text, utf16 as usize),
		_ => text.chars().count(),
	}
}

/// Textarea with entity autocomplete.
///
/// Typing `@`, `#` or `*` at the start of a word, or `{` anywhere, opens a
/// popup of matching entities; choosing one replaces what was typed with a
/// canonical mention.
#[component]
pub fn MentionInput(
	/// Note text, updated as the user types.
	content: RwSignal<String>,
	/// Shown while the note is empty.
	#[prop(into, default = "Escreva aqui...".to_string())]
	placeholder: String,
) -> impl IntoView {
	let ctx = use_app_context();
	let textarea_ref = NodeRef::<leptos::html::Textarea>::new();
	// The detected context together with the caret it was detected at.
	let autocomplete = RwSignal::new(None::<(AutocompleteState, usize)>);
	let selected = RwSignal::new(0usize);

	let suggestions = Memo::new(move |_| {
		autocomplete.with(|found| match found {
			Some((state, _)) => ctx.entities.with(|dir| {
				dir.suggest(state, SUGGESTION_LIMIT)
					.into_iter()
					.cloned()
					.collect::<Vec<Entity>>()
			}),
			None => Vec::new(),
		})
	});

	let refresh = move |el: &HtmlTextAreaElement| {
		let text = el.value();
		let caret = caret_of(el, &text);
		autocomplete.set(detect_autocomplete_context(&text, caret).map(|state| (state, caret)));
		selected.set(0);
	};

	let insert = move |entity: Entity| {
		let Some((state, caret)) = autocomplete.get_untracked() else {
			return;
		};
		let (text, new_caret) = content.with_untracked(|text| {
			complete_mention(text, &state, caret, entity.kind.as_str(), &entity.id)
		});
		debug!("inserted mention of {} at {}", entity.id, state.trigger_position);
		content.set(text.clone());
		autocomplete.set(None);

		if let Some(el) = textarea_ref.get_untracked() {
			el.set_value(&text);
			let pos = char_to_utf16_offset(&text, new_caret) as u32;
			let _ = el.set_selection_range(pos, pos);
			let _ = el.focus();
		}
	};

	let on_input = move |ev: web_sys::Event| {
		let Some(el) = ev
			.target()
			.and_then(|t| t.dyn_into::<HtmlTextAreaElement>().ok())
		else {
			return;
		};
		content.set(el.value());
		refresh(&el);
	};

	let on_caret_move = move || {
		if let Some(el) = textarea_ref.get_untracked() {
			refresh(&el);
		}
	};

	let on_keydown = move |ev: KeyboardEvent| {
		let count = suggestions.with_untracked(Vec::len);
		if count == 0 {
			return;
		}
		match ev.key().as_str() {
			"ArrowDown" => {
				ev.prevent_default();
				selected.update(|i| *i = cycle(*i, count, true));
			}
			"ArrowUp" => {
				ev.prevent_default();
				selected.update(|i| *i = cycle(*i, count, false));
			}
			"Enter" | "Tab" => {
				ev.prevent_default();
				let choice = suggestions.with_untracked(|s| s.get(selected.get_untracked()).cloned());
				if let Some(entity) = choice {
					insert(entity);
				}
			}
			"Escape" => {
				ev.prevent_default();
				autocomplete.set(None);
			}
			_ => {}
		}
	};

	view! {
		<div class="mention-input">
			<textarea
				node_ref=textarea_ref
				class="mention-input-area"
				placeholder=placeholder
				prop:value=move || content.get()
				on:input=on_input
				on:click=move |_| on_caret_move()
				on:keyup=move |ev: KeyboardEvent| {
					if matches!(ev.key().as_str(), "ArrowLeft" | "ArrowRight" | "Home" | "End") {
						on_caret_move();
					}
				}
				on:keydown=on_keydown
				on:blur=move |_| autocomplete.set(None)
			/>
			{move || {
				let list = suggestions.get();
				(!list.is_empty())
					.then(|| {
						view! {
							<ul class="mention-suggestions">
								{list
									.into_iter()
									.enumerate()
									.map(|(idx, entity)| {
										let label = entity.badge_label();
										let style = format!("color: {};", entity.display_color());
										view! {
											<li
												class=move || {
													if selected.get() == idx {
														"mention-suggestion selected"
													} else {
														"mention-suggestion"
													}
												}
												style=style
												// mousedown, not click: the textarea must keep focus
												on:mousedown=move |ev: MouseEvent| {
													ev.prevent_default();
													insert(entity.clone());
												}
											>
												{label}
											</li>
										}
									})
									.collect_view()}
							</ul>
						}
					})
			}}
		</div>
	}
}
