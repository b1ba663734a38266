//! End-to-End Integration Tests
//!
//! This module tests the complete polling cycle:
//! 1. Config loading from YAML (endpoints pointed at a mock server)
//! 2. Rates board scheduler publishing snapshots + best rates
//! 3. Arbitrage scheduler publishing a report
//! 4. Shutdown
//!
//! # Running the tests
//! ```bash
//! cargo test --test full_cycle
//! ```

use std::time::Duration;

use mockito::Matcher;

use rate_scanner::adapters::{AssetSymbol, QuoteClient};
use rate_scanner::config::load_config_from_str;
use rate_scanner::core::{
    ArbitrageScanner, BoardPoller, PollingScheduler, PriceAggregator, RateSource,
};

fn config_yaml(base: &str) -> String {
    format!(
        r#"
http:
  timeout_ms: 2000
board:
  poll_interval_ms: 3600000
  assets: [BTC, USDT, TON]
  exchanges:
    - name: Binance
      endpoint: {base}/api/v3/ticker/price
      shape: binance
      symbol_param: symbol
      symbols:
        BTC: BTCUSDT
        USDT: BUSDUSDT
        TON: TONUSDT
    - name: Bybit
      endpoint: {base}/v5/market/tickers
      shape: bybit
      params:
        category: spot
      symbol_param: symbol
      symbols:
        BTC: BTCUSDT
        USDT: USDCUSDT
arbitrage:
  poll_interval_ms: 3600000
  upbit_url: {base}/v1
  binance_url: {base}/api/v3
  markets: [KRW-BTC]
"#,
        base = base
    )
}

async fn mock_binance(server: &mut mockito::ServerGuard, symbol: &str, price: &str) -> mockito::Mock {
    server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::UrlEncoded("symbol".into(), symbol.into()))
        .with_status(200)
        .with_body(format!(r#"{{"symbol":"{}","price":"{}"}}"#, symbol, price))
        .create_async()
        .await
}

async fn mock_bybit(server: &mut mockito::ServerGuard, symbol: &str, price: &str) -> mockito::Mock {
    server
        .mock("GET", "/v5/market/tickers")
        .match_query(Matcher::UrlEncoded("symbol".into(), symbol.into()))
        .with_status(200)
        .with_body(format!(
            r#"{{"retCode":0,"result":{{"category":"spot","list":[{{"symbol":"{}","lastPrice":"{}"}}]}}}}"#,
            symbol, price
        ))
        .create_async()
        .await
}

#[tokio::test]
async fn test_board_cycle_publishes_best_rates() {
    let mut server = mockito::Server::new_async().await;
    let _b_btc = mock_binance(&mut server, "BTCUSDT", "67000.50").await;
    let _b_usdt = mock_binance(&mut server, "BUSDUSDT", "1.0001").await;
    let _b_ton = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::UrlEncoded("symbol".into(), "TONUSDT".into()))
        .with_status(500)
        .create_async()
        .await;
    let _y_btc = mock_bybit(&mut server, "BTCUSDT", "67010.00").await;
    let _y_usdt = mock_bybit(&mut server, "USDCUSDT", "0.9999").await;

    let config = load_config_from_str(&config_yaml(&server.url())).unwrap();
    let client = QuoteClient::new(config.http.timeout_ms).unwrap();
    let board = BoardPoller::new(
        PriceAggregator::new(client),
        config.board.exchanges.clone(),
        config.board.assets.clone(),
    );
    let handle = PollingScheduler::new(board, Duration::from_millis(config.board.poll_interval_ms)).start();

    let state = tokio::time::timeout(Duration::from_secs(5), handle.wait_for_cycle(1))
        .await
        .expect("first board cycle not published");
    assert!(!state.loading);
    assert!(state.error.is_none());

    let board = state.data.expect("board data");
    assert_eq!(board.snapshots.len(), 2);
    assert_eq!(board.snapshots[0].exchange, "Binance");
    assert_eq!(board.snapshots[1].exchange, "Bybit");

    // every snapshot is keyed by the full asset list
    for snapshot in &board.snapshots {
        assert_eq!(snapshot.quotes.len(), 3);
    }

    assert_eq!(board.best[&AssetSymbol::Btc].exchange, "Bybit");
    assert_eq!(board.best[&AssetSymbol::Btc].price, 67010.00);
    assert_eq!(board.best[&AssetSymbol::Usdt].exchange, "Binance");
    assert!(!board.best.contains_key(&AssetSymbol::Ton));

    let usdt = &board.snapshots[0].quotes[&AssetSymbol::Usdt];
    assert_eq!(usdt.note.as_deref(), Some("Stablecoin pair"));

    handle.shutdown();
}

#[tokio::test]
async fn test_arbitrage_cycle_publishes_report() {
    let mut server = mockito::Server::new_async().await;
    let _markets = server
        .mock("GET", "/v1/market/all")
        .with_status(200)
        .with_body(r#"[{"market":"KRW-BTC"},{"market":"KRW-ETH"}]"#)
        .create_async()
        .await;
    // serves both the FX leg and the price leg
    let _upbit = server
        .mock("GET", "/v1/ticker")
        .match_query(Matcher::UrlEncoded("markets".into(), "KRW-BTC".into()))
        .with_status(200)
        .with_body(r#"[{"market":"KRW-BTC","trade_price":91000000.0}]"#)
        .create_async()
        .await;
    let _fx = mock_binance(&mut server, "BTCUSDT", "65000.00").await;
    let _batch = server
        .mock("GET", "/api/v3/ticker/price")
        .match_query(Matcher::UrlEncoded("symbols".into(), r#"["BTCUSDT"]"#.into()))
        .with_status(200)
        .with_body(r#"[{"symbol":"BTCUSDT","price":"65000.00"}]"#)
        .create_async()
        .await;

    let config = load_config_from_str(&config_yaml(&server.url())).unwrap();
    let scanner = ArbitrageScanner::new(
        QuoteClient::new(config.http.timeout_ms).unwrap(),
        config.arbitrage.clone(),
    );
    let handle = PollingScheduler::new(scanner, Duration::from_millis(config.arbitrage.poll_interval_ms)).start();

    let state = tokio::time::timeout(Duration::from_secs(5), handle.wait_for_cycle(1))
        .await
        .expect("first arbitrage cycle not published");
    assert!(state.error.is_none(), "Got: {:?}", state.error);

    let report = state.data.expect("report data");
    // KRW rate = 91_000_000 / 65_000 = 1400, so both venues agree exactly
    assert_eq!(report.fx.source, RateSource::Live);
    assert!((report.fx.krw_per_usd - 1400.0).abs() < 1e-9);
    assert_eq!(report.pairs, vec!["KRW-BTC"]);
    assert_eq!(report.rows.len(), 1);
    assert!(report.rows[0].raw_difference_pct.abs() < 1e-9);
    assert!((report.rows[0].net_difference_pct + 0.15).abs() < 1e-9);
    assert!(!report.rows[0].is_profitable);

    handle.shutdown();
}
