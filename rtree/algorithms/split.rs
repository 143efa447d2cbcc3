use super::super::node::Bounded;
use super::super::rectangle::BoundingBox;

/// 二次分裂算法 - 遵循Gut84.pdf论文Algorithm QuadraticSplit
///
/// 叶子节点（数据条目）和索引节点（子节点）共用同一套分裂逻辑。
/// 返回的两组都至少包含 `min_items` 个条目（条目总数足够时）。
pub(crate) fn quadratic_split<E: Bounded>(
    mut entries: Vec<E>,
    min_items: usize,
) -> (Vec<E>, Vec<E>) {
    // QS1: 选择种子 - 浪费空间最大的两个条目
    let (seed1, seed2) = pick_seeds(&entries);

    // seed1 < seed2，先移除索引大的，保持剩余条目的原始顺序
    let second = entries.remove(seed2);
    let first = entries.remove(seed1);

    let mut bbox1 = *first.bbox();
    let mut bbox2 = *second.bbox();
    let mut group1 = vec![first];
    let mut group2 = vec![second];

    let mut remaining = entries.len();
    for entry in entries {
        // QS2: 某一组必须拿走剩余全部条目才能达到最小条目数时，直接分配
        let to_first = if group1.len() + remaining <= min_items {
            true
        } else if group2.len() + remaining <= min_items {
            false
        } else {
            // QS3: 分配给扩大成本较小的组
            prefers_first(&bbox1, &bbox2, entry.bbox(), group1.len(), group2.len())
        };
        remaining -= 1;

        if to_first {
            bbox1 = bbox1.union(entry.bbox());
            group1.push(entry);
        } else {
            bbox2 = bbox2.union(entry.bbox());
            group2.push(entry);
        }
    }

    (group1, group2)
}

/// PickSeeds算法 - 选择组合后死空间最大的两个条目
///
/// 死空间 = 包含两个条目的矩形面积 - 两个条目各自的面积。
/// 返回的索引满足 `i < j`。
pub(crate) fn pick_seeds<E: Bounded>(entries: &[E]) -> (usize, usize) {
    let mut max_waste = f64::NEG_INFINITY;
    let mut best_pair = (0, 1);

    for i in 0..entries.len() {
        for j in (i + 1)..entries.len() {
            let rect1 = entries[i].bbox();
            let rect2 = entries[j].bbox();
            let waste = rect1.union(rect2).area() - rect1.area() - rect2.area();

            if waste > max_waste {
                max_waste = waste;
                best_pair = (i, j);
            }
        }
    }

    best_pair
}

/// 条目是否应该加入第一组
///
/// 依次比较：面积扩大量、周长扩大量、组面积、组条目数；全部相同时归入第一组。
fn prefers_first(
    bbox1: &BoundingBox,
    bbox2: &BoundingBox,
    rect: &BoundingBox,
    len1: usize,
    len2: usize,
) -> bool {
    let enlargement1 = bbox1.enlargement(rect);
    let enlargement2 = bbox2.enlargement(rect);
    if enlargement1 != enlargement2 {
        return enlargement1 < enlargement2;
    }

    let margin1 = bbox1.margin_enlargement(rect);
    let margin2 = bbox2.margin_enlargement(rect);
    if margin1 != margin2 {
        return margin1 < margin2;
    }

    let area1 = bbox1.area();
    let area2 = bbox2.area();
    if area1 != area2 {
        return area1 < area2;
    }

    len1 <= len2
}
