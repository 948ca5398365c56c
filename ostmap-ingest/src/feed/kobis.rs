//! KOBIS (Korean Film Council) open API client
//!
//! Two endpoints: the daily box-office ranking and the movie list lookup
//! that carries English/original titles and genre keywords.

use super::{BoxOfficeFeed, FeedError, MovieMetadata, RankedMovie};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

const BOXOFFICE_URL: &str =
    "http://www.kobis.or.kr/kobisopenapi/webservice/rest/boxoffice/searchDailyBoxOfficeList.json";
const MOVIE_LIST_URL: &str =
    "http://www.kobis.or.kr/kobisopenapi/webservice/rest/movie/searchMovieList.json";
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// KOBIS feed client
pub struct KobisClient {
    http_client: reqwest::Client,
    api_key: String,
}

impl KobisClient {
    pub fn new(api_key: String) -> Result<Self, FeedError> {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| FeedError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            api_key,
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> Result<T, FeedError> {
        let response = self
            .http_client
            .get(url)
            .query(query)
            .send()
            .await
            .map_err(|e| FeedError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FeedError::Api(status.as_u16(), body));
        }

        response
            .json()
            .await
            .map_err(|e| FeedError::Parse(e.to_string()))
    }
}

#[async_trait]
impl BoxOfficeFeed for KobisClient {
    async fn daily_box_office(
        &self,
        target_date: &str,
        limit: usize,
    ) -> Result<Vec<RankedMovie>, FeedError> {
        let limit_str = limit.to_string();

        tracing::debug!(target_date = %target_date, limit, "Fetching daily box office");

        let response: BoxOfficeResponse = self
            .get_json(
                BOXOFFICE_URL,
                &[
                    ("key", self.api_key.as_str()),
                    ("targetDt", target_date),
                    ("itemPerPage", &limit_str),
                ],
            )
            .await?;

        Ok(response.into_ranked())
    }

    async fn movie_metadata(&self, title: &str) -> Result<MovieMetadata, FeedError> {
        let response: MovieListResponse = self
            .get_json(
                MOVIE_LIST_URL,
                &[("key", self.api_key.as_str()), ("movieNm", title)],
            )
            .await?;

        Ok(response.into_metadata())
    }
}

#[derive(Debug, Deserialize)]
struct BoxOfficeResponse {
    #[serde(rename = "boxOfficeResult")]
    box_office_result: Option<BoxOfficeResult>,
}

#[derive(Debug, Deserialize)]
struct BoxOfficeResult {
    #[serde(rename = "dailyBoxOfficeList", default)]
    daily_box_office_list: Vec<WireRankedMovie>,
}

#[derive(Debug, Deserialize)]
struct WireRankedMovie {
    /// The feed serializes the rank as a string
    rank: String,
    #[serde(rename = "movieNm")]
    movie_nm: String,
}

impl BoxOfficeResponse {
    fn into_ranked(self) -> Vec<RankedMovie> {
        self.box_office_result
            .map(|result| {
                result
                    .daily_box_office_list
                    .into_iter()
                    .filter_map(|m| {
                        let rank = m.rank.parse().ok()?;
                        Some(RankedMovie {
                            rank,
                            title: m.movie_nm,
                        })
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[derive(Debug, Deserialize)]
struct MovieListResponse {
    #[serde(rename = "movieListResult")]
    movie_list_result: Option<MovieListResult>,
}

#[derive(Debug, Deserialize)]
struct MovieListResult {
    #[serde(rename = "movieList", default)]
    movie_list: Vec<WireMovie>,
}

#[derive(Debug, Deserialize)]
struct WireMovie {
    #[serde(rename = "movieNmEn", default)]
    movie_nm_en: String,
    #[serde(rename = "movieNmOg", default)]
    movie_nm_og: String,
    #[serde(rename = "genreAlt", default)]
    genre_alt: String,
}

impl MovieListResponse {
    fn into_metadata(self) -> MovieMetadata {
        let movie = self
            .movie_list_result
            .and_then(|result| result.movie_list.into_iter().next());

        match movie {
            Some(movie) => MovieMetadata {
                genres: movie
                    .genre_alt
                    .split(',')
                    .map(str::trim)
                    .filter(|g| !g.is_empty())
                    .map(str::to_string)
                    .collect(),
                title_en: Some(movie.movie_nm_en).filter(|t| !t.is_empty()),
                title_og: Some(movie.movie_nm_og).filter(|t| !t.is_empty()),
            },
            None => MovieMetadata::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_office_parsing() {
        let json = r#"
        {
            "boxOfficeResult": {
                "boxofficeType": "일별 박스오피스",
                "dailyBoxOfficeList": [
                    {"rank": "1", "movieNm": "파묘", "salesAmt": "1"},
                    {"rank": "2", "movieNm": "듄: 파트2", "salesAmt": "2"}
                ]
            }
        }
        "#;

        let response: BoxOfficeResponse = serde_json::from_str(json).unwrap();
        let ranked = response.into_ranked();
        assert_eq!(
            ranked,
            vec![
                RankedMovie {
                    rank: 1,
                    title: "파묘".to_string()
                },
                RankedMovie {
                    rank: 2,
                    title: "듄: 파트2".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_box_office_empty_result() {
        let response: BoxOfficeResponse = serde_json::from_str("{}").unwrap();
        assert!(response.into_ranked().is_empty());
    }

    #[test]
    fn test_movie_metadata_parsing() {
        let json = r#"
        {
            "movieListResult": {
                "movieList": [
                    {
                        "movieNm": "센과 치히로의 행방불명",
                        "movieNmEn": "Spirited Away",
                        "movieNmOg": "千と千尋の神隠し",
                        "genreAlt": "애니메이션,가족"
                    }
                ]
            }
        }
        "#;

        let response: MovieListResponse = serde_json::from_str(json).unwrap();
        let metadata = response.into_metadata();
        assert_eq!(metadata.title_en.as_deref(), Some("Spirited Away"));
        assert_eq!(metadata.title_og.as_deref(), Some("千と千尋の神隠し"));
        assert_eq!(metadata.genres, vec!["애니메이션", "가족"]);
    }

    #[test]
    fn test_movie_metadata_empty_fields() {
        let json = r#"
        {
            "movieListResult": {
                "movieList": [
                    {"movieNm": "파묘", "movieNmEn": "", "movieNmOg": "", "genreAlt": ""}
                ]
            }
        }
        "#;

        let response: MovieListResponse = serde_json::from_str(json).unwrap();
        let metadata = response.into_metadata();
        assert_eq!(metadata, MovieMetadata::default());
    }
}
