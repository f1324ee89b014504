use std::borrow::Cow;

/// HTML 转义，替换 `&`、`<`、`>`、`"` 与 `'`。
///
/// 不含需要转义的字符时直接借用原字符串。
pub fn escape_html(s: &str) -> Cow<'_, str> {
    if !s.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(s);
    }
    let mut escaped = String::with_capacity(s.len() + 16);
    for c in s.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// 回显页面构建器。
///
/// 页面包含两个 `<pre>` 区块：客户端发来的原始请求，以及按所选格式渲染的负载。
/// 两者在插入模板之前都会被转义，因此请求中的标记字符不会破坏页面结构。
pub struct HtmlBuilder {
    title: String,
    request: String,
    label: String,
    payload: String,
}

impl HtmlBuilder {
    pub fn new(request: &str, label: &str, payload: &str) -> Self {
        Self {
            title: "Simple Webserver".to_string(),
            request: escape_html(request).into_owned(),
            label: label.to_string(),
            payload: escape_html(payload).into_owned(),
        }
    }

    pub fn build(&self) -> String {
        format!(
            r##"<!doctype html>
<html>
  <head>
    <meta charset="UTF-8">
    <title>{}</title>
  </head>
  <body>
    <h1>Simple Webserver</h1>
    <hr>
    <h2>Request message</h2>
    <pre>{}</pre>
    <h2>Message in the chosen format {}</h2>
    <pre>{}</pre>
    <hr>
  </body>
</html>"##,
            self.title, self.request, self.label, self.payload
        )
    }
}
