use super::audit_overlay::AuditOverlay;
use super::sample_id::SampleId;
use crate::shared::error::AuditError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Indicator status that puts an incident in the audit worklist
pub const NON_COMPLIANT_STATUS: &str = "NÃO ADERENTE";

/// Spreadsheet columns understood by the import, keyed by their header name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncidentColumn {
    IndicatorIcgName,
    SampleId,
    Volume,
    Indicator,
    IndicatorStatus,
    Regional,
    Group,
    CityUf,
    Uf,
    Technology,
    Service,
    Nature,
    Symptom,
    OpeningTool,
    Closing,
    Solution,
    Impact,
    SentToField,
    StartedAt,
    SystemStartedAt,
    ArrivedCopFoAt,
    InProgressAt,
    DesignatedAt,
    FirstDispatchRfAt,
    FirstDispatchFoAt,
    FirstDispatchGponAt,
    EndedAt,
    SystemEndedAt,
    SystemFirstClosingAt,
    Tma,
    Tmr,
    YearMonth,
}

impl IncidentColumn {
    pub const ALL: [IncidentColumn; 32] = [
        IncidentColumn::IndicatorIcgName,
        IncidentColumn::SampleId,
        IncidentColumn::Volume,
        IncidentColumn::Indicator,
        IncidentColumn::IndicatorStatus,
        IncidentColumn::Regional,
        IncidentColumn::Group,
        IncidentColumn::CityUf,
        IncidentColumn::Uf,
        IncidentColumn::Technology,
        IncidentColumn::Service,
        IncidentColumn::Nature,
        IncidentColumn::Symptom,
        IncidentColumn::OpeningTool,
        IncidentColumn::Closing,
        IncidentColumn::Solution,
        IncidentColumn::Impact,
        IncidentColumn::SentToField,
        IncidentColumn::StartedAt,
        IncidentColumn::SystemStartedAt,
        IncidentColumn::ArrivedCopFoAt,
        IncidentColumn::InProgressAt,
        IncidentColumn::DesignatedAt,
        IncidentColumn::FirstDispatchRfAt,
        IncidentColumn::FirstDispatchFoAt,
        IncidentColumn::FirstDispatchGponAt,
        IncidentColumn::EndedAt,
        IncidentColumn::SystemEndedAt,
        IncidentColumn::SystemFirstClosingAt,
        IncidentColumn::Tma,
        IncidentColumn::Tmr,
        IncidentColumn::YearMonth,
    ];

    /// Upper-case header name as exported by the reporting tool
    pub fn header(&self) -> &'static str {
        match self {
            IncidentColumn::IndicatorIcgName => "INDICADOR_NOME_ICG",
            IncidentColumn::SampleId => "ID_MOSTRA",
            IncidentColumn::Volume => "VOLUME",
            IncidentColumn::Indicator => "INDICADOR",
            IncidentColumn::IndicatorStatus => "INDICADOR_STATUS",
            IncidentColumn::Regional => "IN_REGIONAL",
            IncidentColumn::Group => "IN_GRUPO",
            IncidentColumn::CityUf => "IN_CIDADE_UF",
            IncidentColumn::Uf => "IN_UF",
            IncidentColumn::Technology => "TECNOLOGIA",
            IncidentColumn::Service => "SERVICO",
            IncidentColumn::Nature => "NATUREZA",
            IncidentColumn::Symptom => "SINTOMA",
            IncidentColumn::OpeningTool => "FERRAMENTA_ABERTURA",
            IncidentColumn::Closing => "FECHAMENTO",
            IncidentColumn::Solution => "SOLUCAO",
            IncidentColumn::Impact => "IMPACTO",
            IncidentColumn::SentToField => "ENVIADO_TOA",
            IncidentColumn::StartedAt => "DT_INICIO",
            IncidentColumn::SystemStartedAt => "DT_INICIO_SISTEMA",
            IncidentColumn::ArrivedCopFoAt => "DT_INICIO_CHEGOU_COP_FO",
            IncidentColumn::InProgressAt => "DT_EM_PROGRESSO",
            IncidentColumn::DesignatedAt => "DT_DESIGNADO",
            IncidentColumn::FirstDispatchRfAt => "DT_PRIMEIRO_ACIONAMENTO_RF",
            IncidentColumn::FirstDispatchFoAt => "DT_PRIMEIRO_ACIONAMENTO_FO",
            IncidentColumn::FirstDispatchGponAt => "DT_PRIMEIRO_ACIONAMENTO_GPON",
            IncidentColumn::EndedAt => "DT_FIM",
            IncidentColumn::SystemEndedAt => "DT_FIM_SISTEMA",
            IncidentColumn::SystemFirstClosingAt => "DT_FIM_SISTEMA_PRIMEIRO_FECHAMENTO",
            IncidentColumn::Tma => "TMA",
            IncidentColumn::Tmr => "TMR",
            IncidentColumn::YearMonth => "ANOMES",
        }
    }
}

/// Timestamps of an incident, kept as the text the spreadsheet exported
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IncidentTimeline {
    pub started_at: Option<String>,
    pub system_started_at: Option<String>,
    pub arrived_cop_fo_at: Option<String>,
    pub in_progress_at: Option<String>,
    pub designated_at: Option<String>,
    pub first_dispatch_rf_at: Option<String>,
    pub first_dispatch_fo_at: Option<String>,
    pub first_dispatch_gpon_at: Option<String>,
    pub ended_at: Option<String>,
    pub system_ended_at: Option<String>,
    pub system_first_closing_at: Option<String>,
}

/// One reported service-quality event plus its audit overlay
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incident {
    /// Storage id, assigned by the store on first insert
    pub id: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub sample_id: Option<SampleId>,
    pub indicator_icg_name: Option<String>,
    pub volume: f64,
    pub indicator: Option<String>,
    pub indicator_status: Option<String>,
    pub regional: Option<String>,
    pub group: Option<String>,
    pub city_uf: Option<String>,
    pub uf: Option<String>,
    pub technology: Option<String>,
    pub service: Option<String>,
    pub nature: Option<String>,
    pub symptom: Option<String>,
    pub opening_tool: Option<String>,
    pub closing: Option<String>,
    pub solution: Option<String>,
    pub impact: Option<String>,
    pub sent_to_field: Option<String>,
    pub timeline: IncidentTimeline,
    /// Mean time to attend
    pub tma: Option<String>,
    /// Mean time to repair
    pub tmr: Option<String>,
    /// Year-month key (`ANOMES`), e.g. `202405`
    pub year_month: Option<String>,
    pub audit: AuditOverlay,
}

impl Incident {
    /// Assigns a spreadsheet cell to the matching field.
    ///
    /// Text is trimmed and blank text becomes `None`. `VOLUME` falls back to
    /// zero when the cell is blank or not a number.
    pub fn set_column(&mut self, column: IncidentColumn, raw: &str) -> Result<(), AuditError> {
        let text = Some(raw.trim())
            .filter(|t| !t.is_empty())
            .map(str::to_string);

        match column {
            IncidentColumn::SampleId => {
                self.sample_id = text.map(SampleId::new).transpose()?;
            }
            IncidentColumn::Volume => {
                self.volume = parse_volume(raw);
            }
            _ => {
                if let Some(slot) = self.text_field_mut(column) {
                    *slot = text;
                }
            }
        }
        Ok(())
    }

    /// Text value of a column, `None` for blank cells
    pub fn column(&self, column: IncidentColumn) -> Option<String> {
        match column {
            IncidentColumn::SampleId => self.sample_id.as_ref().map(|id| id.to_string()),
            IncidentColumn::Volume => Some(format_volume(self.volume)),
            _ => self.text_field(column).and_then(|value| value.clone()),
        }
    }

    /// Whether the row carries either key the import filters on
    pub fn has_identity(&self) -> bool {
        self.sample_id.is_some() || self.indicator.is_some()
    }

    /// Whether the incident belongs to the audit worklist
    pub fn is_non_compliant(&self) -> bool {
        self.indicator_status
            .as_deref()
            .map(|s| s.trim().to_uppercase() == NON_COMPLIANT_STATUS)
            .unwrap_or(false)
    }

    /// Replaces every spreadsheet-sourced field with the values of `other`,
    /// keeping this incident's storage id, creation time and audit overlay.
    pub fn merge_imported(&mut self, other: Incident) {
        let id = self.id.take();
        let created_at = self.created_at.take();
        let audit = std::mem::take(&mut self.audit);
        *self = Incident {
            id,
            created_at,
            audit,
            ..other
        };
    }

    fn text_field(&self, column: IncidentColumn) -> Option<&Option<String>> {
        let field = match column {
            IncidentColumn::IndicatorIcgName => &self.indicator_icg_name,
            IncidentColumn::Indicator => &self.indicator,
            IncidentColumn::IndicatorStatus => &self.indicator_status,
            IncidentColumn::Regional => &self.regional,
            IncidentColumn::Group => &self.group,
            IncidentColumn::CityUf => &self.city_uf,
            IncidentColumn::Uf => &self.uf,
            IncidentColumn::Technology => &self.technology,
            IncidentColumn::Service => &self.service,
            IncidentColumn::Nature => &self.nature,
            IncidentColumn::Symptom => &self.symptom,
            IncidentColumn::OpeningTool => &self.opening_tool,
            IncidentColumn::Closing => &self.closing,
            IncidentColumn::Solution => &self.solution,
            IncidentColumn::Impact => &self.impact,
            IncidentColumn::SentToField => &self.sent_to_field,
            IncidentColumn::StartedAt => &self.timeline.started_at,
            IncidentColumn::SystemStartedAt => &self.timeline.system_started_at,
            IncidentColumn::ArrivedCopFoAt => &self.timeline.arrived_cop_fo_at,
            IncidentColumn::InProgressAt => &self.timeline.in_progress_at,
            IncidentColumn::DesignatedAt => &self.timeline.designated_at,
            IncidentColumn::FirstDispatchRfAt => &self.timeline.first_dispatch_rf_at,
            IncidentColumn::FirstDispatchFoAt => &self.timeline.first_dispatch_fo_at,
            IncidentColumn::FirstDispatchGponAt => &self.timeline.first_dispatch_gpon_at,
            IncidentColumn::EndedAt => &self.timeline.ended_at,
            IncidentColumn::SystemEndedAt => &self.timeline.system_ended_at,
            IncidentColumn::SystemFirstClosingAt => &self.timeline.system_first_closing_at,
            IncidentColumn::Tma => &self.tma,
            IncidentColumn::Tmr => &self.tmr,
            IncidentColumn::YearMonth => &self.year_month,
            IncidentColumn::SampleId | IncidentColumn::Volume => return None,
        };
        Some(field)
    }

    fn text_field_mut(&mut self, column: IncidentColumn) -> Option<&mut Option<String>> {
        let field = match column {
            IncidentColumn::IndicatorIcgName => &mut self.indicator_icg_name,
            IncidentColumn::Indicator => &mut self.indicator,
            IncidentColumn::IndicatorStatus => &mut self.indicator_status,
            IncidentColumn::Regional => &mut self.regional,
            IncidentColumn::Group => &mut self.group,
            IncidentColumn::CityUf => &mut self.city_uf,
            IncidentColumn::Uf => &mut self.uf,
            IncidentColumn::Technology => &mut self.technology,
            IncidentColumn::Service => &mut self.service,
            IncidentColumn::Nature => &mut self.nature,
            IncidentColumn::Symptom => &mut self.symptom,
            IncidentColumn::OpeningTool => &mut self.opening_tool,
            IncidentColumn::Closing => &mut self.closing,
            IncidentColumn::Solution => &mut self.solution,
            IncidentColumn::Impact => &mut self.impact,
            IncidentColumn::SentToField => &mut self.sent_to_field,
            IncidentColumn::StartedAt => &mut self.timeline.started_at,
            IncidentColumn::SystemStartedAt => &mut self.timeline.system_started_at,
            IncidentColumn::ArrivedCopFoAt => &mut self.timeline.arrived_cop_fo_at,
            IncidentColumn::InProgressAt => &mut self.timeline.in_progress_at,
            IncidentColumn::DesignatedAt => &mut self.timeline.designated_at,
            IncidentColumn::FirstDispatchRfAt => &mut self.timeline.first_dispatch_rf_at,
            IncidentColumn::FirstDispatchFoAt => &mut self.timeline.first_dispatch_fo_at,
            IncidentColumn::FirstDispatchGponAt => &mut self.timeline.first_dispatch_gpon_at,
            IncidentColumn::EndedAt => &mut self.timeline.ended_at,
            IncidentColumn::SystemEndedAt => &mut self.timeline.system_ended_at,
            IncidentColumn::SystemFirstClosingAt => &mut self.timeline.system_first_closing_at,
            IncidentColumn::Tma => &mut self.tma,
            IncidentColumn::Tmr => &mut self.tmr,
            IncidentColumn::YearMonth => &mut self.year_month,
            IncidentColumn::SampleId | IncidentColumn::Volume => return None,
        };
        Some(field)
    }
}

fn parse_volume(raw: &str) -> f64 {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

fn format_volume(volume: f64) -> String {
    if volume.fract() == 0.0 && volume.abs() < 1e15 {
        format!("{}", volume as i64)
    } else {
        volume.to_string()
    }
}
