mod app;
mod bridge;
mod pages;

fn main() {
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    leptos::mount_to_body(app::App);
}
