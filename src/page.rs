//! Minimal HTML pages: the login prompt and one-line status messages.

/// Escape text for use in HTML element content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn document(body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n\
         <html lang=\"en\">\n\
         <head><meta charset=\"utf-8\"><title>Authorization</title></head>\n\
         <body>\n{body}\n</body>\n\
         </html>\n"
    )
}

/// Page hosting the Telegram Login widget.
///
/// The widget itself is injected by `/login.js`, which reads the bot name from the
/// container's `data-bot` attribute.
pub fn login_prompt(bot_username: &str) -> String {
    document(&format!(
        "<div id=\"tg-container\" data-bot=\"{}\"></div>\n<script src=\"/login.js\"></script>",
        escape(bot_username)
    ))
}

/// Page carrying a single status message.
pub fn message(text: &str) -> String {
    document(&format!("<p>{}</p>", escape(text)))
}

/// Loader served at `/login.js`.
///
/// Injects the widget script and, on callback, reloads the current path with the user
/// object as URL-encoded JSON in `auth_data`.
pub const LOGIN_SCRIPT: &str = r#"(function () {
    var container = document.getElementById('tg-container');
    if (!container) {
        console.error('Telegram container not found');
        return;
    }

    window.onTelegramAuth = function (user) {
        var authData = JSON.stringify(user);
        window.location.href = window.location.pathname + '?auth_data=' + encodeURIComponent(authData);
    };

    var script = document.createElement('script');
    script.async = true;
    script.src = 'https://telegram.org/js/telegram-widget.js?22';
    script.setAttribute('data-telegram-login', container.dataset.bot);
    script.setAttribute('data-size', 'large');
    script.setAttribute('data-userpic', 'true');
    script.setAttribute('data-onauth', 'onTelegramAuth(user)');
    container.appendChild(script);
})();
"#;
