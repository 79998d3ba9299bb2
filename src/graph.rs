//! Directed graph algorithms over connection keys.

use std::collections::BTreeSet;

use crate::gene::{ConnectionKey, NodeKey};


/// Collects the nodes needed to compute the outputs of a network.
///
/// Starting from the outputs, repeatedly adds the sources of connections leading into the
/// current frontier. Expansion stops once no new source is found or every new source is an
/// input.
///
/// # Arguments
/// * `inputs` - keys of the external inputs
/// * `outputs` - keys of the output nodes
/// * `connections` - keys of the connections to consider (usually the enabled ones)
///
/// # Returns
/// The output keys together with every non-input node discovered on the way. Input keys are
/// never part of the result.
pub fn required_for_output<I>(inputs: &[NodeKey], outputs: &[NodeKey], connections: I) -> BTreeSet<NodeKey>
where
    I: IntoIterator<Item = ConnectionKey>,
{
    let connections: Vec<ConnectionKey> = connections.into_iter().collect();
    let mut required: BTreeSet<NodeKey> = outputs.iter().copied().collect();
    let mut frontier = required.clone();
    loop {
        let sources: BTreeSet<NodeKey> = connections
            .iter()
            .filter(|(source, target)| frontier.contains(target) && !frontier.contains(source))
            .map(|(source, _)| *source)
            .collect();
        if sources.is_empty() {
            break;
        }
        let internal: Vec<NodeKey> = sources.iter().copied().filter(|key| !inputs.contains(key)).collect();
        if internal.is_empty() {
            break;
        }
        required.extend(internal);
        frontier.extend(sources);
    }
    return required;
}


/// Returns `true` if adding `candidate` to `connections` would close a cycle.
///
/// Self loops count as cycles.
pub fn creates_cycle<'a, I>(connections: I, candidate: ConnectionKey) -> bool
where
    I: IntoIterator<Item = &'a ConnectionKey>,
{
    let (source, target) = candidate;
    if source == target {
        return true;
    }
    let connections: Vec<ConnectionKey> = connections.into_iter().copied().collect();
    let mut visited = BTreeSet::from([target]);
    loop {
        let mut added = 0;
        for (from, to) in &connections {
            if visited.contains(from) && !visited.contains(to) {
                if *to == source {
                    return true;
                }
                visited.insert(*to);
                added += 1;
            }
        }
        if added == 0 {
            return false;
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_direct_connections() {
        let required = required_for_output(&[-1, -2], &[0], [(-1, 0), (-2, 0)]);
        assert_eq!(required, BTreeSet::from([0]));
    }

    #[test]
    fn test_required_intermediate_node() {
        let required = required_for_output(&[-1, -2], &[0], [(-1, 1), (1, 0)]);
        assert_eq!(required, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_required_ignores_dead_ends() {
        // node 2 feeds nothing required, node 3 is unreachable from the inputs but still feeds 0
        let connections = [(-1, 1), (1, 0), (-2, 2), (3, 0)];
        let required = required_for_output(&[-1, -2], &[0], connections);
        assert_eq!(required, BTreeSet::from([0, 1, 3]));
    }

    #[test]
    fn test_required_without_connections() {
        let required = required_for_output(&[-1], &[0, 1], Vec::new());
        assert_eq!(required, BTreeSet::from([0, 1]));
    }

    #[test]
    fn test_required_with_cycle_terminates() {
        let connections = [(-1, 1), (1, 2), (2, 1), (2, 0)];
        let required = required_for_output(&[-1], &[0], connections);
        assert_eq!(required, BTreeSet::from([0, 1, 2]));
    }

    #[test]
    fn test_creates_cycle() {
        let connections = vec![(-1, 1), (1, 2), (2, 0)];
        assert!(creates_cycle(&connections, (0, 1)));
        assert!(creates_cycle(&connections, (2, 1)));
        assert!(creates_cycle(&connections, (3, 3)));
        assert!(!creates_cycle(&connections, (1, 0)));
        assert!(!creates_cycle(&connections, (-1, 0)));
        assert!(!creates_cycle(&Vec::new(), (0, 1)));
    }
}
