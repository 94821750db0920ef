use crate::cluster::Row;

/// Puts every row into left-to-right order by top-left x.
///
/// Rows keep their top-to-bottom order. The sort is stable, so tokens sharing
/// an x keep the order the clusterer gave them.
#[must_use]
pub fn order_rows(mut rows: Vec<Row>) -> Vec<Row> {
    for row in &mut rows {
        row.tokens_mut()
            .sort_by(|left, right| left.anchor_x().total_cmp(&right.anchor_x()));
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::order_rows;
    use crate::cluster::cluster_rows;
    use crate::token::Token;

    fn token(text: &str, x: f64, y: f64) -> Token {
        Token::at(text, x, y).expect("valid token")
    }

    #[test]
    fn orders_by_x_even_when_y_differs_within_row() {
        // "right" sits higher on the page, so the (y, x) sort puts it first.
        let rows = cluster_rows(
            vec![token("left", 0.0, 6.0), token("right", 120.0, 2.0)],
            10.0,
        )
        .expect("clusters");
        let ordered = order_rows(rows);

        let texts: Vec<&str> = ordered[0].tokens().iter().map(Token::text).collect();
        assert_eq!(texts, vec!["left", "right"]);
    }

    #[test]
    fn equal_x_keeps_clustered_order() {
        let rows = cluster_rows(
            vec![
                token("second", 40.0, 3.0),
                token("first", 40.0, 1.0),
                token("lead", 10.0, 4.0),
            ],
            10.0,
        )
        .expect("clusters");
        let ordered = order_rows(rows);

        let texts: Vec<&str> = ordered[0].tokens().iter().map(Token::text).collect();
        assert_eq!(texts, vec!["lead", "first", "second"]);
    }

    #[test]
    fn keeps_row_order() {
        let rows = cluster_rows(
            vec![token("bottom", 0.0, 50.0), token("top", 90.0, 0.0)],
            10.0,
        )
        .expect("clusters");
        let ordered = order_rows(rows);
        assert_eq!(ordered[0].tokens()[0].text(), "top");
        assert_eq!(ordered[1].tokens()[0].text(), "bottom");
    }
}
