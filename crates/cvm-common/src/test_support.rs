use std::sync::Mutex;

static ENV_GUARD: Mutex<()> = Mutex::new(());

/// Run `f` with the given variables set (or removed), restoring them after.
pub(crate) fn with_env(vars: &[(&str, Option<&str>)], f: impl FnOnce()) {
    let _guard = ENV_GUARD.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let prev: Vec<(String, Option<String>)> = vars
        .iter()
        .map(|(key, value)| {
            let previous = std::env::var(key).ok();
            match value {
                Some(v) => unsafe { std::env::set_var(key, v) },
                None => unsafe { std::env::remove_var(key) },
            }
            (key.to_string(), previous)
        })
        .collect();

    f();

    for (key, previous) in prev {
        if let Some(v) = previous {
            unsafe { std::env::set_var(&key, v) };
        } else {
            unsafe { std::env::remove_var(&key) };
        }
    }
}
