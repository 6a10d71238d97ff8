use leptos::prelude::*;

/// 404 page
#[component]
pub fn NotFound() -> impl IntoView {
	view! {
		<h1>"Página não encontrada"</h1>
		<a href="/">"Voltar ao diário"</a>
	}
}
