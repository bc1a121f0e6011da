// Interactive dashboard page
use crate::domain::chart::ChartDescription;

pub fn render_page(chart: &ChartDescription, refresh_ms: u128) -> serde_json::Result<String> {
    // Keep the embedded JSON from closing the script element
    let figure = serde_json::to_string(chart)?.replace("</", "<\\/");
    Ok(PAGE_TEMPLATE
        .replace("{{FIGURE}}", &figure)
        .replace("{{REFRESH_MS}}", &refresh_ms.to_string()))
}

const PAGE_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Environment Data Viewer</title>
    <script src="https://cdn.plot.ly/plotly-2.35.2.min.js" charset="utf-8"></script>
    <style>
        body { font-family: system-ui, -apple-system, sans-serif; margin: 0; padding: 1.5rem; background: #f8fafc; color: #1e293b; }
        h1 { font-size: 1.5rem; font-weight: 600; margin: 0 0 1rem 0; }
        #environment-graph { background: #ffffff; border: 1px solid #e2e8f0; border-radius: 0.5rem; min-height: 450px; }
    </style>
</head>
<body>
    <h1>Environment Data Viewer</h1>
    <div id="environment-graph"></div>
    <script>
        const graph = document.getElementById('environment-graph');

        function draw(figure) {
            Plotly.react(graph, figure.data || [], figure.layout || {});
        }

        async function refresh() {
            try {
                const response = await fetch(window.location.pathname, {
                    headers: { 'Accept': 'application/json' },
                    cache: 'no-store'
                });
                if (response.ok) {
                    draw(await response.json());
                }
            } catch (e) {
                // Keep the last figure on screen
            }
        }

        draw({{FIGURE}});
        setInterval(refresh, {{REFRESH_MS}});
    </script>
</body>
</html>
"##;
