use std::sync::Arc;

use hooklab_core::*;
use hooklab_ui::*;

use crate::console::Console;
use crate::feed::CommentFeed;

/// Fetches the first comment's email once at mount. The click counter is
/// independent of the fetch.
///
/// Nothing cancels the fetch: a response that arrives after unmount still
/// runs the callback, and the state update it makes is dropped.
pub fn EffectTutorial(feed: &Arc<dyn CommentFeed>, console: &Console) -> Node {
    let (data, set_data) = use_state(String::new);
    let (count, set_count) = use_state(|| 0);

    use_effect(Deps::once(), {
        let feed = feed.clone();
        let console = console.clone();
        move || {
            let spawned = spawn_blocking(
                move || feed.first_email(),
                move |result| match result {
                    Ok(email) => {
                        set_data.set(email);
                        console.log("API WAS CALLED");
                    }
                    Err(e) => log::warn!("comment fetch failed: {e}"),
                },
            );
            if let Err(e) = spawned {
                log::warn!("could not start comment fetch: {e}");
            }
            Dispose::none()
        }
    });

    Div().child((
        Text("Hello World"),
        Heading(data),
        Heading(count.to_string()),
        Button("Click", move || set_count.set(count + 1)),
    ))
}
