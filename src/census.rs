use reqwest::blocking::Client;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use serde_json::Value;
use tracing::info;

use crate::domain::{Dataset, Region};
use crate::error::EtlError;
use crate::table::Table;

pub trait CensusClient {
    fn fetch(&self, dataset: Dataset, region: Region) -> Result<Table, EtlError>;
}

impl<T: CensusClient + ?Sized> CensusClient for &T {
    fn fetch(&self, dataset: Dataset, region: Region) -> Result<Table, EtlError> {
        (**self).fetch(dataset, region)
    }
}

#[derive(Clone)]
pub struct CensusHttpClient {
    client: Client,
    api_key: Option<String>,
}

impl CensusHttpClient {
    pub fn new() -> Result<Self, EtlError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_AGENT,
            HeaderValue::from_str(&format!("census-tract-etl/{}", env!("CARGO_PKG_VERSION")))
                .map_err(|err| EtlError::CensusHttp(err.to_string()))?,
        );
        let client = Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|err| EtlError::CensusHttp(err.to_string()))?;

        let api_key = std::env::var("CENSUS_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());

        Ok(Self { client, api_key })
    }
}

impl CensusClient for CensusHttpClient {
    fn fetch(&self, dataset: Dataset, region: Region) -> Result<Table, EtlError> {
        let params = query_params(dataset, region);
        let mut request = self.client.get(dataset.base_url()).query(&params);
        if let Some(key) = &self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }
        let response = request
            .send()
            .map_err(|err| EtlError::CensusHttp(err.to_string()))?;
        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response
                .text()
                .unwrap_or_else(|_| "Census request failed".to_string());
            return Err(EtlError::CensusStatus { status, message });
        }
        let body = response
            .text()
            .map_err(|err| EtlError::CensusHttp(err.to_string()))?;
        parse_response(&body)
    }
}

pub fn query_params(dataset: Dataset, region: Region) -> [(&'static str, String); 3] {
    [
        ("get", dataset.fields().to_string()),
        ("for", "TRACT:*".to_string()),
        ("in", format!("state:{}", region.code())),
    ]
}

/// Parses the API's array-of-arrays body. The first inner array is the
/// header; every following array is a row of the same arity.
pub fn parse_response(body: &str) -> Result<Table, EtlError> {
    let value: Value =
        serde_json::from_str(body).map_err(|err| EtlError::MalformedResponse(err.to_string()))?;
    let Value::Array(outer) = value else {
        return Err(EtlError::MalformedResponse(
            "expected a JSON array of arrays".to_string(),
        ));
    };
    let mut outer = outer.into_iter();
    let header = match outer.next() {
        Some(header) => string_row(header)?,
        None => {
            return Err(EtlError::MalformedResponse(
                "response has no header row".to_string(),
            ));
        }
    };
    let rows = outer.map(string_row).collect::<Result<Vec<_>, _>>()?;
    Table::from_strings(header, rows)
}

fn string_row(value: Value) -> Result<Vec<String>, EtlError> {
    let cells = match value {
        Value::Array(cells) => cells,
        other => {
            return Err(EtlError::MalformedResponse(format!(
                "expected an array row, found {other}"
            )));
        }
    };
    cells
        .into_iter()
        .map(|cell| match cell {
            Value::String(text) => Ok(text),
            Value::Null => Ok(String::new()),
            Value::Number(number) => Ok(number.to_string()),
            other => Err(EtlError::MalformedResponse(format!(
                "unexpected cell value {other}"
            ))),
        })
        .collect()
}

/// Requests `dataset` for every region in order and stacks the results.
pub fn fetch_dataset<C: CensusClient + ?Sized>(
    client: &C,
    dataset: Dataset,
) -> Result<Table, EtlError> {
    let mut tables = Vec::with_capacity(Region::ALL.len());
    for region in Region::ALL {
        let table = client.fetch(dataset, region)?;
        info!(%dataset, %region, rows = table.len(), "fetched tracts");
        tables.push(table);
    }
    Ok(Table::concat(tables))
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn parses_header_and_rows() {
        let body = r#"[["NAME","state","county","tract"],
            ["Census Tract 1; Cook County; Illinois","17","031","010100"]]"#;
        let table = parse_response(body).unwrap();
        assert_eq!(table.columns(), ["NAME", "state", "county", "tract"]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.value(0, "county"), Some("031"));
    }

    #[test]
    fn rejects_non_array_body() {
        let err = parse_response(r#"{"error":"unknown variable"}"#).unwrap_err();
        assert_matches!(err, EtlError::MalformedResponse(_));
    }

    #[test]
    fn rejects_html_error_page() {
        let err = parse_response("<html>error</html>").unwrap_err();
        assert_matches!(err, EtlError::MalformedResponse(_));
    }

    #[test]
    fn rejects_empty_document() {
        let err = parse_response("[]").unwrap_err();
        assert_matches!(err, EtlError::MalformedResponse(_));
    }

    #[test]
    fn rejects_ragged_rows() {
        let err = parse_response(r#"[["a","b"],["1"]]"#).unwrap_err();
        assert_matches!(err, EtlError::RowArity { .. });
    }

    #[test]
    fn query_targets_all_tracts_in_region() {
        let params = query_params(Dataset::CommunityResilience, Region::California);
        assert_eq!(params[0].1, Dataset::CommunityResilience.fields());
        assert_eq!(params[1], ("for", "TRACT:*".to_string()));
        assert_eq!(params[2], ("in", "state:06".to_string()));
    }
}
