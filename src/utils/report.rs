use crate::dto::candidature_dto::AdminReport;
use crate::models::candidature::Candidature;
use chrono::Local;
use std::fmt::Write;

/// Renders the admin report page from the structured report data. Services
/// never touch HTML; this is the only place markup is produced.
pub fn render_admin_report(report: &AdminReport) -> String {
    let mut rows = String::new();
    for candidature in &report.candidatures {
        rows.push_str(&render_row(candidature));
    }

    format!(
        r#"<!DOCTYPE html>
<html lang="fr">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Administration - Candidatures</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 20px; background: #f5f5f5; }}
        .container {{ max-width: 1200px; margin: 0 auto; }}
        h1 {{ color: #1a73e8; text-align: center; }}
        .stats {{ display: flex; gap: 20px; margin-bottom: 30px; }}
        .stat-card {{ background: white; padding: 20px; border-radius: 8px; flex: 1; text-align: center; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        .stat-number {{ font-size: 2rem; font-weight: bold; color: #1a73e8; }}
        .stat-label {{ color: #666; margin-top: 5px; }}
        table {{ width: 100%; background: white; border-radius: 8px; overflow: hidden; box-shadow: 0 2px 4px rgba(0,0,0,0.1); }}
        th, td {{ padding: 12px; text-align: left; border-bottom: 1px solid #eee; }}
        th {{ background: #1a73e8; color: white; }}
        .documents {{ display: flex; gap: 10px; }}
        .doc-link {{ background: #e8f0fe; color: #1a73e8; padding: 4px 8px; border-radius: 4px; text-decoration: none; font-size: 0.8rem; }}
        .status-ok {{ color: #34a853; font-weight: bold; }}
        .status-missing {{ color: #ea4335; font-weight: bold; }}
    </style>
</head>
<body>
    <div class="container">
        <h1>Administration des candidatures</h1>
        <div class="stats">
            <div class="stat-card">
                <div class="stat-number">{total}</div>
                <div class="stat-label">Total Candidatures</div>
            </div>
            <div class="stat-card">
                <div class="stat-number">{complete}</div>
                <div class="stat-label">Dossiers Complets</div>
            </div>
            <div class="stat-card">
                <div class="stat-number">{today}</div>
                <div class="stat-label">Aujourd'hui</div>
            </div>
        </div>
        <table>
            <thead>
                <tr>
                    <th>ID</th>
                    <th>Nom Complet</th>
                    <th>Email</th>
                    <th>SPI</th>
                    <th>Téléphone</th>
                    <th>Documents</th>
                    <th>Date</th>
                    <th>Statut</th>
                </tr>
            </thead>
            <tbody>
{rows}            </tbody>
        </table>
    </div>
</body>
</html>
"#,
        total = report.total,
        complete = report.complete_dossiers,
        today = report.submitted_today,
        rows = rows,
    )
}

fn render_row(candidature: &Candidature) -> String {
    let mut docs = String::from(r#"<div class="documents">"#);
    for (reference, label) in [
        (&candidature.document_front, "Recto"),
        (&candidature.document_back, "Verso"),
        (&candidature.residence_proof, "Domicile"),
    ] {
        if let Some(reference) = reference {
            let _ = write!(
                docs,
                r#"<a href="/api/uploads/{}" target="_blank" class="doc-link">{}</a>"#,
                escape_html(reference),
                label
            );
        }
    }
    docs.push_str("</div>");

    let complete = candidature.has_complete_documents();
    let status_class = if complete { "status-ok" } else { "status-missing" };
    let status_text = if complete { "Complet" } else { "Incomplet" };
    let date = candidature
        .submitted_at
        .with_timezone(&Local)
        .format("%d/%m/%Y %H:%M");

    format!(
        "                <tr>\n                    <td>#{id}</td>\n                    <td>{name}</td>\n                    <td>{email}</td>\n                    <td>{spi}</td>\n                    <td>{phone}</td>\n                    <td>{docs}</td>\n                    <td>{date}</td>\n                    <td class=\"{status_class}\">{status_text}</td>\n                </tr>\n",
        id = candidature.id,
        name = escape_html(&candidature.full_name),
        email = escape_html(&candidature.email),
        spi = escape_html(&candidature.spi_number),
        phone = escape_html(&candidature.phone),
        docs = docs,
        date = date,
        status_class = status_class,
        status_text = status_text,
    )
}

fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
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
