use super::backend_client::BackendClient;
use crate::audit::domain::{AuditOverlay, AuditStatus, Incident, IncidentTimeline, SampleId};
use crate::ports::outbound::{IncidentQuery, IncidentRepository};
use crate::shared::error::AuditError;
use crate::shared::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

/// Default incidents table
pub const DEFAULT_INCIDENTS_TABLE: &str = "assertividade_incidentes";

/// Rows fetched per request when no limit is given
const PAGE_SIZE: usize = 1000;

/// A stored row, with the backend's column names
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct IncidentRow {
    id: Option<serde_json::Value>,
    created_at: Option<DateTime<Utc>>,
    id_mostra: Option<String>,
    indicador_nome_icg: Option<String>,
    volume: Option<f64>,
    indicador: Option<String>,
    indicador_status: Option<String>,
    in_regional: Option<String>,
    in_grupo: Option<String>,
    in_cidade_uf: Option<String>,
    in_uf: Option<String>,
    tecnologia: Option<String>,
    servico: Option<String>,
    natureza: Option<String>,
    sintoma: Option<String>,
    ferramenta_abertura: Option<String>,
    fechamento: Option<String>,
    solucao: Option<String>,
    impacto: Option<String>,
    enviado_toa: Option<String>,
    dt_inicio: Option<String>,
    dt_inicio_sistema: Option<String>,
    dt_inicio_chegou_cop_fo: Option<String>,
    dt_em_progresso: Option<String>,
    dt_designado: Option<String>,
    dt_primeiro_acionamento_rf: Option<String>,
    dt_primeiro_acionamento_fo: Option<String>,
    dt_primeiro_acionamento_gpon: Option<String>,
    dt_fim: Option<String>,
    dt_fim_sistema: Option<String>,
    dt_fim_sistema_primeiro_fechamento: Option<String>,
    tma: Option<String>,
    tmr: Option<String>,
    anomes: Option<String>,
    status_audit: Option<String>,
    audit_corrigido: Option<bool>,
    audit_motivo: Option<String>,
    audit_login_ofensor: Option<String>,
    audit_evidencia_url: Option<String>,
    audit_updated_at: Option<DateTime<Utc>>,
    audit_login: Option<String>,
    audit_feedback_enviado: Option<bool>,
}

impl IncidentRow {
    fn into_incident(self) -> Incident {
        let id = self.id.map(|value| match value {
            serde_json::Value::String(s) => s,
            other => other.to_string(),
        });

        let sample_id = self.id_mostra.and_then(|raw| match SampleId::new(raw) {
            Ok(sample_id) => Some(sample_id),
            Err(e) => {
                tracing::warn!(id = ?id, error = %e, "ignoring invalid stored ID_MOSTRA");
                None
            }
        });

        Incident {
            id,
            created_at: self.created_at,
            sample_id,
            indicator_icg_name: self.indicador_nome_icg,
            volume: self.volume.unwrap_or(0.0),
            indicator: self.indicador,
            indicator_status: self.indicador_status,
            regional: self.in_regional,
            group: self.in_grupo,
            city_uf: self.in_cidade_uf,
            uf: self.in_uf,
            technology: self.tecnologia,
            service: self.servico,
            nature: self.natureza,
            symptom: self.sintoma,
            opening_tool: self.ferramenta_abertura,
            closing: self.fechamento,
            solution: self.solucao,
            impact: self.impacto,
            sent_to_field: self.enviado_toa,
            timeline: IncidentTimeline {
                started_at: self.dt_inicio,
                system_started_at: self.dt_inicio_sistema,
                arrived_cop_fo_at: self.dt_inicio_chegou_cop_fo,
                in_progress_at: self.dt_em_progresso,
                designated_at: self.dt_designado,
                first_dispatch_rf_at: self.dt_primeiro_acionamento_rf,
                first_dispatch_fo_at: self.dt_primeiro_acionamento_fo,
                first_dispatch_gpon_at: self.dt_primeiro_acionamento_gpon,
                ended_at: self.dt_fim,
                system_ended_at: self.dt_fim_sistema,
                system_first_closing_at: self.dt_fim_sistema_primeiro_fechamento,
            },
            tma: self.tma,
            tmr: self.tmr,
            year_month: self.anomes,
            audit: AuditOverlay {
                status: AuditStatus::from_wire(self.status_audit.as_deref()),
                corrected: self.audit_corrigido,
                reason: self.audit_motivo,
                offender_login: self.audit_login_ofensor,
                feedback_sent: self.audit_feedback_enviado.unwrap_or(false),
                evidence_url: self.audit_evidencia_url,
                auditor_login: self.audit_login,
                audited_at: self.audit_updated_at,
            },
        }
    }
}

/// Spreadsheet-sourced columns only; the audit columns are never sent on import
#[derive(Debug, Serialize)]
struct IncidentUpsertRow<'a> {
    id_mostra: &'a str,
    indicador_nome_icg: Option<&'a str>,
    volume: f64,
    indicador: Option<&'a str>,
    indicador_status: Option<&'a str>,
    in_regional: Option<&'a str>,
    in_grupo: Option<&'a str>,
    in_cidade_uf: Option<&'a str>,
    in_uf: Option<&'a str>,
    tecnologia: Option<&'a str>,
    servico: Option<&'a str>,
    natureza: Option<&'a str>,
    sintoma: Option<&'a str>,
    ferramenta_abertura: Option<&'a str>,
    fechamento: Option<&'a str>,
    solucao: Option<&'a str>,
    impacto: Option<&'a str>,
    enviado_toa: Option<&'a str>,
    dt_inicio: Option<&'a str>,
    dt_inicio_sistema: Option<&'a str>,
    dt_inicio_chegou_cop_fo: Option<&'a str>,
    dt_em_progresso: Option<&'a str>,
    dt_designado: Option<&'a str>,
    dt_primeiro_acionamento_rf: Option<&'a str>,
    dt_primeiro_acionamento_fo: Option<&'a str>,
    dt_primeiro_acionamento_gpon: Option<&'a str>,
    dt_fim: Option<&'a str>,
    dt_fim_sistema: Option<&'a str>,
    dt_fim_sistema_primeiro_fechamento: Option<&'a str>,
    tma: Option<&'a str>,
    tmr: Option<&'a str>,
    anomes: Option<&'a str>,
}

impl<'a> IncidentUpsertRow<'a> {
    fn from_incident(incident: &'a Incident) -> Result<Self> {
        let sample_id = incident.sample_id.as_ref().ok_or_else(|| AuditError::Validation {
            message: "Cannot upsert an incident without ID_MOSTRA".to_string(),
        })?;
        let timeline = &incident.timeline;

        Ok(Self {
            id_mostra: sample_id.as_str(),
            indicador_nome_icg: incident.indicator_icg_name.as_deref(),
            volume: incident.volume,
            indicador: incident.indicator.as_deref(),
            indicador_status: incident.indicator_status.as_deref(),
            in_regional: incident.regional.as_deref(),
            in_grupo: incident.group.as_deref(),
            in_cidade_uf: incident.city_uf.as_deref(),
            in_uf: incident.uf.as_deref(),
            tecnologia: incident.technology.as_deref(),
            servico: incident.service.as_deref(),
            natureza: incident.nature.as_deref(),
            sintoma: incident.symptom.as_deref(),
            ferramenta_abertura: incident.opening_tool.as_deref(),
            fechamento: incident.closing.as_deref(),
            solucao: incident.solution.as_deref(),
            impacto: incident.impact.as_deref(),
            enviado_toa: incident.sent_to_field.as_deref(),
            dt_inicio: timeline.started_at.as_deref(),
            dt_inicio_sistema: timeline.system_started_at.as_deref(),
            dt_inicio_chegou_cop_fo: timeline.arrived_cop_fo_at.as_deref(),
            dt_em_progresso: timeline.in_progress_at.as_deref(),
            dt_designado: timeline.designated_at.as_deref(),
            dt_primeiro_acionamento_rf: timeline.first_dispatch_rf_at.as_deref(),
            dt_primeiro_acionamento_fo: timeline.first_dispatch_fo_at.as_deref(),
            dt_primeiro_acionamento_gpon: timeline.first_dispatch_gpon_at.as_deref(),
            dt_fim: timeline.ended_at.as_deref(),
            dt_fim_sistema: timeline.system_ended_at.as_deref(),
            dt_fim_sistema_primeiro_fechamento: timeline.system_first_closing_at.as_deref(),
            tma: incident.tma.as_deref(),
            tmr: incident.tmr.as_deref(),
            anomes: incident.year_month.as_deref(),
        })
    }
}

#[derive(Debug, Serialize)]
struct AuditUpdateRow<'a> {
    status_audit: &'static str,
    audit_corrigido: Option<bool>,
    audit_motivo: Option<&'a str>,
    audit_login_ofensor: Option<&'a str>,
    audit_evidencia_url: Option<&'a str>,
    audit_updated_at: Option<DateTime<Utc>>,
    audit_login: Option<&'a str>,
    audit_feedback_enviado: bool,
}

impl<'a> From<&'a AuditOverlay> for AuditUpdateRow<'a> {
    fn from(overlay: &'a AuditOverlay) -> Self {
        Self {
            status_audit: overlay.status.as_wire(),
            audit_corrigido: overlay.corrected,
            audit_motivo: overlay.reason.as_deref(),
            audit_login_ofensor: overlay.offender_login.as_deref(),
            audit_evidencia_url: overlay.evidence_url.as_deref(),
            audit_updated_at: overlay.audited_at,
            audit_login: overlay.auditor_login.as_deref(),
            audit_feedback_enviado: overlay.feedback_sent,
        }
    }
}

/// RestIncidentRepository adapter for the hosted relational store
///
/// Talks to the REST endpoint of the incidents table: upserts are merged on
/// `id_mostra`, filters use the `column=eq.value` syntax and counts come
/// from the `Content-Range` header.
pub struct RestIncidentRepository {
    client: BackendClient,
    table: String,
}

impl RestIncidentRepository {
    pub fn new(client: BackendClient, table: impl Into<String>) -> Self {
        Self {
            client,
            table: table.into(),
        }
    }

    fn table_path(&self) -> String {
        format!("/rest/v1/{}", urlencoding::encode(&self.table))
    }

    /// `?select=*&...` query string for a find
    ///
    /// The order always ends on the storage id so that limit/offset pages
    /// neither skip nor repeat rows sharing a creation time.
    fn find_query(query: &IncidentQuery, limit: usize, offset: usize) -> String {
        let mut params = vec!["select=*".to_string()];
        params.extend(Self::filters(query));
        if query.newest_first {
            params.push("order=created_at.desc,id.desc".to_string());
        } else {
            params.push("order=id.asc".to_string());
        }
        params.push(format!("limit={}", limit));
        if offset > 0 {
            params.push(format!("offset={}", offset));
        }
        params.join("&")
    }

    fn filters(query: &IncidentQuery) -> Vec<String> {
        let mut filters = Vec::new();
        if let Some(status) = &query.indicator_status {
            filters.push(eq_filter("indicador_status", status));
        }
        if let Some(status) = query.audit_status {
            filters.push(eq_filter("status_audit", status.as_wire()));
        }
        if let Some(login) = &query.offender_login {
            filters.push(eq_filter("audit_login_ofensor", login));
        }
        filters
    }

    async fn fetch_page(&self, query: &IncidentQuery, limit: usize, offset: usize) -> Result<Vec<Incident>> {
        let path = format!("{}?{}", self.table_path(), Self::find_query(query, limit, offset));
        let response = self.client.request(Method::GET, &path).send().await?;
        let response = BackendClient::ensure_success(response, "fetch incidents").await?;

        let rows: Vec<IncidentRow> = response.json().await?;
        Ok(rows.into_iter().map(IncidentRow::into_incident).collect())
    }

    /// PATCHes one row by storage id; an empty representation means no such row
    async fn patch_row<T: Serialize + Sync>(&self, incident_id: &str, body: &T, operation: &str) -> Result<()> {
        let path = format!("{}?{}", self.table_path(), eq_filter("id", incident_id));
        let response = self
            .client
            .request(Method::PATCH, &path)
            .header("Prefer", "return=representation")
            .json(body)
            .send()
            .await?;
        let response = BackendClient::ensure_success(response, operation).await?;

        let updated: Vec<serde_json::Value> = response.json().await?;
        if updated.is_empty() {
            return Err(AuditError::IncidentNotFound {
                id: incident_id.to_string(),
            }
            .into());
        }
        Ok(())
    }
}

#[async_trait]
impl IncidentRepository for RestIncidentRepository {
    async fn upsert_batch(&self, batch: &[Incident]) -> Result<usize> {
        let rows = batch
            .iter()
            .map(IncidentUpsertRow::from_incident)
            .collect::<Result<Vec<_>>>()?;

        let path = format!("{}?on_conflict=id_mostra", self.table_path());
        let response = self
            .client
            .request(Method::POST, &path)
            .header("Prefer", "resolution=merge-duplicates,return=minimal")
            .json(&rows)
            .send()
            .await?;
        BackendClient::ensure_success(response, "upsert incidents").await?;

        Ok(rows.len())
    }

    async fn find_incidents(&self, query: &IncidentQuery) -> Result<Vec<Incident>> {
        if let Some(limit) = query.limit {
            return self.fetch_page(query, limit, 0).await;
        }

        let mut incidents = Vec::new();
        loop {
            let page = self.fetch_page(query, PAGE_SIZE, incidents.len()).await?;
            let done = page.len() < PAGE_SIZE;
            incidents.extend(page);
            if done {
                break;
            }
        }
        Ok(incidents)
    }

    async fn count_incidents(&self, status: Option<AuditStatus>) -> Result<u64> {
        let query = IncidentQuery {
            audit_status: status,
            ..IncidentQuery::default()
        };
        let mut params = vec!["select=*".to_string()];
        params.extend(Self::filters(&query));
        let path = format!("{}?{}", self.table_path(), params.join("&"));

        let response = self
            .client
            .request(Method::HEAD, &path)
            .header("Prefer", "count=exact")
            .send()
            .await?;
        let response = BackendClient::ensure_success(response, "count incidents").await?;

        let content_range = response
            .headers()
            .get("content-range")
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        parse_content_range_total(content_range).ok_or_else(|| {
            AuditError::BackendError {
                operation: "count incidents".to_string(),
                status: response.status().as_u16(),
                details: format!("Missing or invalid Content-Range header: '{}'", content_range),
            }
            .into()
        })
    }

    async fn record_audit(&self, incident_id: &str, overlay: &AuditOverlay) -> Result<()> {
        self.patch_row(incident_id, &AuditUpdateRow::from(overlay), "save audit")
            .await
    }

    async fn set_feedback_sent(&self, incident_id: &str, sent: bool) -> Result<()> {
        let body = serde_json::json!({ "audit_feedback_enviado": sent });
        self.patch_row(incident_id, &body, "mark feedback sent").await
    }
}

fn eq_filter(column: &str, value: &str) -> String {
    format!("{}=eq.{}", column, urlencoding::encode(value))
}

/// Total from `0-24/3573` or `*/0`
fn parse_content_range_total(header: &str) -> Option<u64> {
    header.rsplit_once('/')?.1.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_row_into_incident() {
        let row: IncidentRow = serde_json::from_value(json!({
            "id": 17,
            "created_at": "2024-05-10T12:00:00Z",
            "id_mostra": "1001",
            "volume": 2,
            "indicador": "REPAIR",
            "indicador_status": "NÃO ADERENTE",
            "in_grupo": "GROUP A",
            "dt_fim": "10/05/2024 11:00",
            "anomes": "202405",
            "status_audit": "Tratado",
            "audit_corrigido": false,
            "audit_motivo": "wrong code",
            "audit_login_ofensor": "JSILVA",
            "audit_feedback_enviado": null,
            "unknown_column": "ignored"
        }))
        .unwrap();

        let incident = row.into_incident();
        assert_eq!(incident.id.as_deref(), Some("17"));
        assert_eq!(incident.sample_id.unwrap().as_str(), "1001");
        assert_eq!(incident.volume, 2.0);
        assert_eq!(incident.group.as_deref(), Some("GROUP A"));
        assert_eq!(incident.timeline.ended_at.as_deref(), Some("10/05/2024 11:00"));
        assert_eq!(incident.audit.status, AuditStatus::Treated);
        assert_eq!(incident.audit.corrected, Some(false));
        assert!(!incident.audit.feedback_sent);
    }

    #[test]
    fn test_row_without_audit_columns_is_pending() {
        let row: IncidentRow = serde_json::from_value(json!({ "id": "uuid-1" })).unwrap();
        let incident = row.into_incident();
        assert_eq!(incident.id.as_deref(), Some("uuid-1"));
        assert_eq!(incident.audit.status, AuditStatus::Pending);
        assert_eq!(incident.volume, 0.0);
    }

    #[test]
    fn test_upsert_row_omits_audit_columns() {
        let incident = Incident {
            sample_id: Some(SampleId::new("1001").unwrap()),
            indicator: Some("REPAIR".to_string()),
            audit: AuditOverlay::treated(true, "x".into(), None, None, None, Utc::now()),
            ..Default::default()
        };

        let json = serde_json::to_value(IncidentUpsertRow::from_incident(&incident).unwrap()).unwrap();
        assert_eq!(json["id_mostra"], "1001");
        assert_eq!(json["indicador"], "REPAIR");
        assert!(json.get("status_audit").is_none());
        assert!(json.get("audit_motivo").is_none());
    }

    #[test]
    fn test_upsert_row_requires_sample_id() {
        assert!(IncidentUpsertRow::from_incident(&Incident::default()).is_err());
    }

    #[test]
    fn test_audit_row_uses_wire_status() {
        let overlay = AuditOverlay::treated(
            false,
            "late".into(),
            Some("JSILVA".into()),
            Some("https://cdn/x.png".into()),
            Some("AUDITOR".into()),
            Utc::now(),
        );
        let json = serde_json::to_value(AuditUpdateRow::from(&overlay)).unwrap();
        assert_eq!(json["status_audit"], "Tratado");
        assert_eq!(json["audit_corrigido"], false);
        assert_eq!(json["audit_login_ofensor"], "JSILVA");
        assert_eq!(json["audit_login"], "AUDITOR");
    }

    #[test]
    fn test_find_query_for_worklist() {
        let query = RestIncidentRepository::find_query(&IncidentQuery::worklist(100), 100, 0);
        assert_eq!(
            query,
            "select=*&indicador_status=eq.N%C3%83O%20ADERENTE&order=created_at.desc,id.desc&limit=100"
        );
    }

    #[test]
    fn test_find_query_with_offset_and_offender() {
        let query = IncidentQuery::treated().with_offender("jsilva");
        assert_eq!(
            RestIncidentRepository::find_query(&query, 1000, 2000),
            "select=*&status_audit=eq.Tratado&audit_login_ofensor=eq.JSILVA&order=id.asc&limit=1000&offset=2000"
        );
    }

    #[test]
    fn test_find_query_pages_in_a_total_order() {
        let treated = RestIncidentRepository::find_query(&IncidentQuery::treated(), 1000, 1000);
        assert_eq!(
            treated,
            "select=*&status_audit=eq.Tratado&order=id.asc&limit=1000&offset=1000"
        );

        let dashboard =
            RestIncidentRepository::find_query(&IncidentQuery::all().newest_first(), 1000, 1000);
        assert_eq!(
            dashboard,
            "select=*&order=created_at.desc,id.desc&limit=1000&offset=1000"
        );
    }

    #[test]
    fn test_parse_content_range() {
        assert_eq!(parse_content_range_total("0-24/3573"), Some(3573));
        assert_eq!(parse_content_range_total("*/0"), Some(0));
        assert_eq!(parse_content_range_total("0-24/*"), None);
        assert_eq!(parse_content_range_total(""), None);
    }
}
