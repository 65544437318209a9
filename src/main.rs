mod app;
mod components;
mod pages;
mod platform;

use app::App;

fn main() {
    leptos::mount::mount_to_body(App);
}
