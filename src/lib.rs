//! Continuum journal client: mention rendering and entry, entity network view.
//!
//! Business logic lives in the backend. This crate tokenizes note content,
//! helps the user type mentions, and lays out the entity network for display.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

// Modules
pub mod components;
pub mod context;
pub mod error;
pub mod mentions;
pub mod model;
mod pages;

use crate::context::{AppContext, provide_app_context};
// Top-Level pages
use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("Logging initialized");
}

/// Root component: owns the application context and routes to the journal page.
#[component]
pub fn App() -> impl IntoView {
	// Provides context that manages stylesheets, titles, meta tags, etc.
	provide_meta_context();

	let ctx = AppContext::new();
	provide_app_context(ctx);
	on_cleanup(move || ctx.teardown());

	view! {
		<Html attr:lang="pt-BR" attr:dir="ltr" attr:data-theme="dark" />

		<Title text="Continuum" />

		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
