//! HTML views: the input form, the result page, the error page

use heartfail_model::{ClinicalRecord, Outcome};

/// Static input form served at `/`
pub const FORM_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Heart Failure Survival Prediction</title>
    <style>
        body {
            font-family: Arial, sans-serif;
            max-width: 640px;
            margin: 40px auto;
            padding: 20px;
            background: #f5f5f5;
        }
        .container {
            background: white;
            padding: 30px;
            border-radius: 8px;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }
        h1 {
            color: #333;
            border-bottom: 3px solid #c0392b;
            padding-bottom: 10px;
        }
        label {
            display: block;
            margin-top: 12px;
            font-weight: bold;
        }
        input, select {
            width: 100%;
            padding: 6px;
            box-sizing: border-box;
        }
        button {
            margin-top: 20px;
            padding: 10px 20px;
            background: #c0392b;
            color: white;
            border: none;
            border-radius: 4px;
        }
    </style>
</head>
<body>
    <div class="container">
        <h1>Heart Failure Survival Prediction</h1>
        <form action="/result" method="post">
            <label for="age">Age (years)</label>
            <input type="number" step="any" id="age" name="age" required>

            <label for="anaemia">Anaemia</label>
            <select id="anaemia" name="anaemia">
                <option value="0">No</option>
                <option value="1">Yes</option>
            </select>

            <label for="creatinine_phosphokinase">Creatinine phosphokinase (mcg/L)</label>
            <input type="number" step="any" id="creatinine_phosphokinase" name="creatinine_phosphokinase" required>

            <label for="diabetes">Diabetes</label>
            <select id="diabetes" name="diabetes">
                <option value="0">No</option>
                <option value="1">Yes</option>
            </select>

            <label for="ejection_fraction">Ejection fraction (%)</label>
            <input type="number" step="any" id="ejection_fraction" name="ejection_fraction" required>

            <label for="high_blood_pressure">High blood pressure</label>
            <select id="high_blood_pressure" name="high_blood_pressure">
                <option value="0">No</option>
                <option value="1">Yes</option>
            </select>

            <label for="platelets">Platelets (kiloplatelets/mL)</label>
            <input type="number" step="any" id="platelets" name="platelets" required>

            <label for="serum_creatinine">Serum creatinine (mg/dL)</label>
            <input type="number" step="any" id="serum_creatinine" name="serum_creatinine" required>

            <label for="serum_sodium">Serum sodium (mEq/L)</label>
            <input type="number" step="any" id="serum_sodium" name="serum_sodium" required>

            <label for="sex">Sex</label>
            <select id="sex" name="sex">
                <option value="0">Female</option>
                <option value="1">Male</option>
            </select>

            <label for="smoking">Smoking</label>
            <select id="smoking" name="smoking">
                <option value="0">No</option>
                <option value="1">Yes</option>
            </select>

            <label for="time">Follow-up period (days)</label>
            <input type="number" step="any" id="time" name="time" required>

            <button type="submit">Predict</button>
        </form>
    </div>
</body>
</html>
"#;

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <title>Heart Failure Survival Prediction</title>
    <style>
        body { font-family: Arial, sans-serif; max-width: 640px; margin: 40px auto; padding: 20px; background: #f5f5f5; }
        .container { background: white; padding: 30px; border-radius: 8px; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }
        table { border-collapse: collapse; width: 100%; }
        td, th { border-bottom: 1px solid #ddd; padding: 6px; text-align: left; }
        .output { font-size: 1.4em; margin-top: 20px; }
    </style>
</head>
<body>
    <div class="container">
"#;

const PAGE_FOOT: &str = r#"        <p><a href="/">New prediction</a></p>
    </div>
</body>
</html>
"#;

/// Result page echoing every submitted value plus the predicted label
pub fn render_result(record: &ClinicalRecord, outcome: Outcome) -> String {
    let mut page = String::with_capacity(PAGE_HEAD.len() + PAGE_FOOT.len() + 1024);
    page.push_str(PAGE_HEAD);
    page.push_str("        <h1>Prediction Result</h1>\n        <table>\n");
    for (name, value) in record.fields() {
        page.push_str(&format!(
            "            <tr><th>{name}</th><td id=\"{name}\">{}</td></tr>\n",
            escape_html(value.unwrap_or_default())
        ));
    }
    page.push_str("        </table>\n");
    page.push_str(&format!(
        "        <p class=\"output\">Prediction: <strong id=\"output\">{}</strong></p>\n",
        outcome.label()
    ));
    page.push_str(PAGE_FOOT);
    page
}

/// Generic failure page; the detail is logged, not shown
pub fn render_error(title: &str) -> String {
    format!(
        "{PAGE_HEAD}        <h1>{}</h1>\n        <p>The request could not be processed.</p>\n{PAGE_FOOT}",
        escape_html(title)
    )
}

/// Escape text for inclusion in HTML element content or attribute values
pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use heartfail_model::FEATURE_ORDER;

    #[test]
    fn form_posts_every_feature_to_result() {
        assert!(FORM_HTML.contains(r#"action="/result" method="post""#));
        for name in FEATURE_ORDER {
            assert!(
                FORM_HTML.contains(&format!("name=\"{name}\"")),
                "form is missing field {name}"
            );
        }
    }

    #[test]
    fn result_page_echoes_values_and_label() {
        let record = ClinicalRecord {
            age: Some("75".into()),
            serum_creatinine: Some("1.9".into()),
            ..Default::default()
        };
        let page = render_result(&record, Outcome::Survived);
        assert!(page.contains(r#"<td id="age">75</td>"#));
        assert!(page.contains(r#"<td id="serum_creatinine">1.9</td>"#));
        assert!(page.contains(r#"<td id="time"></td>"#));
        assert!(page.contains(r#"<strong id="output">survived</strong>"#));
    }

    #[test]
    fn echoed_values_are_escaped() {
        let record = ClinicalRecord {
            age: Some("<script>alert('x')</script>".into()),
            ..Default::default()
        };
        let page = render_result(&record, Outcome::Unknown);
        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(&#39;x&#39;)&lt;/script&gt;"));
    }

    #[test]
    fn escape_leaves_plain_text_alone() {
        assert_eq!(escape_html("265000"), "265000");
        assert_eq!(escape_html("a & \"b\""), "a &amp; &quot;b&quot;");
    }
}
