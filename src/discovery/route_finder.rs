use crate::core::{Route, RouteHop};
use crate::discovery::graph::{PoolEdge, PoolGraph};
use log::debug;

/// Bounded depth-first enumeration of simple routes through a [`PoolGraph`].
///
/// A route never revisits a denom and never uses the same pool twice.
pub struct RouteFinder<'a> {
    graph: &'a PoolGraph,
    max_hops: usize,
}

impl<'a> RouteFinder<'a> {
    pub fn new(graph: &'a PoolGraph, max_hops: usize) -> Self {
        Self { graph, max_hops }
    }

    /// All routes from `token_in` to `token_out` of at most `max_hops` hops.
    ///
    /// Identical denoms on both ends yield no routes.
    pub fn find_routes(&self, token_in: &str, token_out: &str) -> Vec<Route> {
        let mut routes = Vec::new();
        if token_in == token_out || self.max_hops == 0 || !self.graph.contains_denom(token_in) {
            return routes;
        }

        let mut path: Vec<&PoolEdge> = Vec::with_capacity(self.max_hops);
        let mut visited = vec![token_in];
        self.search(token_in, token_out, &mut path, &mut visited, &mut routes);

        debug!(
            "Found {} routes {} -> {} within {} hops",
            routes.len(),
            token_in,
            token_out,
            self.max_hops
        );
        routes
    }

    fn search<'s>(
        &self,
        current: &str,
        target: &str,
        path: &mut Vec<&'s PoolEdge>,
        visited: &mut Vec<&'s str>,
        routes: &mut Vec<Route>,
    ) where
        'a: 's,
    {
        for edge in self.graph.edges_from(current) {
            if path.iter().any(|used| used.pool_id == edge.pool_id) {
                continue;
            }

            if edge.token_out == target {
                path.push(edge);
                routes.push(Self::to_route(visited[0], target, path));
                path.pop();
            } else if path.len() + 1 < self.max_hops
                && !visited.contains(&edge.token_out.as_str())
            {
                path.push(edge);
                visited.push(&edge.token_out);
                self.search(&edge.token_out, target, path, visited, routes);
                visited.pop();
                path.pop();
            }
        }
    }

    fn to_route(token_in: &str, token_out: &str, path: &[&PoolEdge]) -> Route {
        let hops = path
            .iter()
            .map(|edge| RouteHop::new(&edge.pool_id, &edge.token_in, &edge.token_out))
            .collect();
        Route::new(token_in, token_out, hops)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{PoolAsset, PoolInfo};
    use rust_decimal::Decimal;
    use test_case::test_case;

    fn pool(id: &str, a: &str, b: &str) -> PoolInfo {
        PoolInfo::weighted(
            id,
            vec![PoolAsset::new(a, 1_000_000), PoolAsset::new(b, 1_000_000)],
            Decimal::new(3, 3),
        )
    }

    fn triangle() -> PoolGraph {
        PoolGraph::build(&[
            pool("1", "uusdc", "uatom"),
            pool("2", "uatom", "uosmo"),
            pool("3", "uusdc", "uosmo"),
        ])
    }

    #[test_case(1, 1 ; "direct only")]
    #[test_case(2, 2 ; "direct and two hop")]
    #[test_case(3, 2 ; "no longer simple path exists")]
    fn test_hop_bound(max_hops: usize, expected: usize) {
        let graph = triangle();
        let routes = RouteFinder::new(&graph, max_hops).find_routes("uusdc", "uosmo");

        assert_eq!(routes.len(), expected);
        for route in &routes {
            assert!(route.len() <= max_hops);
            assert!(route.is_well_formed());
        }
    }

    #[test]
    fn test_same_denom_and_unknown_denom_have_no_routes() {
        let graph = triangle();
        let finder = RouteFinder::new(&graph, 3);

        assert!(finder.find_routes("uatom", "uatom").is_empty());
        assert!(finder.find_routes("uion", "uosmo").is_empty());
        assert!(finder.find_routes("uosmo", "uion").is_empty());
    }

    #[test]
    fn test_pool_never_reused_within_route() {
        let three_asset = PoolInfo::weighted(
            "7",
            vec![
                PoolAsset::new("uusdc", 1_000_000),
                PoolAsset::new("uatom", 1_000_000),
                PoolAsset::new("uosmo", 1_000_000),
            ],
            Decimal::ZERO,
        );
        let graph = PoolGraph::build(&[three_asset]);
        let routes = RouteFinder::new(&graph, 3).find_routes("uusdc", "uosmo");

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].pool_ids(), vec!["7"]);
    }
}
